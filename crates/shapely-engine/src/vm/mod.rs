//! Analysis state
//!
//! [`Vm`] is the single mutable handle threaded through class decoration.
//! It owns the type lattice, the class table, the program-point graph, the
//! error log, and the current program point.

pub mod args;
pub mod class;
pub mod matcher;
pub mod program;
pub mod value;

pub use args::CallArgs;
pub use class::{ClassBuilder, ClassLocal, ClassMetadata, ClassObject, ClassTable, LocalOp, LocalOpKind, Ordering};
pub use matcher::{BadMatch, Matcher};
pub use program::{NodeId, Program};
pub use value::{
    Binding, Constant, FunctionKind, FunctionValue, InitAssignment, InitSource, Param, Signature, Value, Variable,
};

use crate::checker::{DecorateError, ErrorLog, WarningConfig};
use crate::types::{ClassId, Type, TypeContext, TypeId};

/// Mutable analysis state
#[derive(Debug, Clone)]
pub struct Vm {
    pub types: TypeContext,
    pub classes: ClassTable,
    pub program: Program,
    pub errorlog: ErrorLog,
    node: NodeId,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// Create a VM with the default warning configuration
    pub fn new() -> Self {
        Self::with_config(WarningConfig::default())
    }

    pub fn with_config(config: WarningConfig) -> Self {
        let program = Program::new();
        let node = program.entry();
        Vm {
            types: TypeContext::new(),
            classes: ClassTable::new(),
            program,
            errorlog: ErrorLog::new(config),
            node,
        }
    }

    /// The current program point
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Create a successor of the current program point and make it current
    pub fn advance(&mut self, label: &str) -> NodeId {
        let next = self.program.connect_new(self.node, label);
        log::trace!("{} -> {} ({})", self.node, next, label);
        self.node = next;
        next
    }

    pub fn class(&self, id: ClassId) -> Result<&ClassObject, DecorateError> {
        self.classes
            .get(id)
            .ok_or(DecorateError::UnknownClass { id: id.as_u32() })
    }

    pub fn class_mut(&mut self, id: ClassId) -> Result<&mut ClassObject, DecorateError> {
        self.classes
            .get_mut(id)
            .ok_or(DecorateError::UnknownClass { id: id.as_u32() })
    }

    /// A matcher over the current type lattice and program
    pub fn matcher(&mut self) -> Matcher<'_> {
        Matcher::new(&mut self.types, &self.program)
    }

    /// Unpack `base[T]` to `T` (see [`TypeContext::match_type_container`])
    pub fn match_type_container(&self, ty: TypeId, base: &str) -> Option<TypeId> {
        self.types.match_type_container(ty, base)
    }

    fn instance_value(&self, ty: TypeId) -> Value {
        match self.types.get(ty) {
            Some(Type::Any) => Value::Unsolvable,
            _ => Value::Instance(ty),
        }
    }

    /// An instance of `ty` at the current program point
    pub fn instance(&self, ty: TypeId) -> Variable {
        Variable::from_value(self.instance_value(ty), self.node)
    }

    /// Create an instance of `ty` at a new program point
    pub fn instantiate(&mut self, ty: TypeId) -> Variable {
        let value = self.instance_value(ty);
        let node = self.advance("instantiate");
        Variable::from_value(value, node)
    }

    /// A constant at the current program point
    pub fn constant(&self, constant: Constant) -> Variable {
        Variable::from_value(Value::Constant(constant), self.node)
    }

    /// The class object of a user-defined class
    pub fn class_value(&self, id: ClassId) -> Result<Variable, DecorateError> {
        let ty = self.class(id)?.ty;
        Ok(Variable::from_value(Value::Class(ty), self.node))
    }

    /// The class object of a named type, e.g. `int` or `list`
    pub fn builtin(&self, name: &str) -> Result<Variable, DecorateError> {
        let ty = self.types.resolve_named_type(name)?;
        Ok(Variable::from_value(Value::Class(ty), self.node))
    }

    /// A function object
    pub fn function(&self, function: FunctionValue) -> Variable {
        Variable::from_value(Value::Function(std::rc::Rc::new(function)), self.node)
    }

    /// Call `func` with `args`, producing its result at a new program point
    ///
    /// Calling a class yields an instance of it; calling a function yields
    /// an instance of its declared return type.
    pub fn call_function(&mut self, func: &Variable, args: &CallArgs) -> Result<Variable, DecorateError> {
        let result = match func.first() {
            Some(Value::Class(ty)) => self.instance_value(*ty),
            Some(Value::Function(f)) => {
                let supplied = args.posargs.len() + args.namedargs.len();
                let required = f.signature.required_count();
                if supplied < required || supplied > f.signature.params.len() {
                    return Err(DecorateError::WrongArgCount {
                        function: f.name.clone(),
                        expected: required,
                        actual: supplied,
                        span: args.span,
                    });
                }
                self.instance_value(f.signature.return_type)
            }
            Some(Value::Unsolvable) => Value::Unsolvable,
            Some(other) => {
                return Err(DecorateError::NotCallable {
                    value: other.describe(&self.types),
                    span: args.span,
                })
            }
            None => {
                return Err(DecorateError::NotCallable {
                    value: "<empty>".to_string(),
                    span: args.span,
                })
            }
        };

        let node = self.advance("call");
        Ok(Variable::from_value(result, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut vm = Vm::new();
        let start = vm.node();
        let next = vm.advance("step");
        assert_ne!(start, next);
        assert_eq!(vm.node(), next);
        assert!(vm.program.is_reachable(start, next));
    }

    #[test]
    fn test_instantiate_advances_node() {
        let mut vm = Vm::new();
        let int = vm.types.int_type();
        let start = vm.node();
        let var = vm.instantiate(int);

        assert_ne!(vm.node(), start);
        assert_eq!(var.first(), Some(&Value::Instance(int)));
        assert_eq!(var.bindings()[0].node, vm.node());

        let any = vm.types.any_type();
        assert_eq!(vm.instantiate(any).first(), Some(&Value::Unsolvable));
    }

    #[test]
    fn test_call_class() {
        let mut vm = Vm::new();
        let list = vm.builtin("list").unwrap();
        let result = vm.call_function(&list, &CallArgs::empty()).unwrap();
        let bare_list = vm.types.lookup_named_type("list").unwrap();
        assert_eq!(result.first(), Some(&Value::Instance(bare_list)));
    }

    #[test]
    fn test_call_function_checks_arity() {
        let mut vm = Vm::new();
        let int = vm.types.int_type();
        let f = vm.function(FunctionValue::declared(
            "make",
            vec![Param {
                name: "seed".into(),
                ty: int,
                default: None,
            }],
            int,
        ));

        let err = vm.call_function(&f, &CallArgs::empty()).unwrap_err();
        assert!(matches!(
            err,
            DecorateError::WrongArgCount {
                expected: 1,
                actual: 0,
                ..
            }
        ));

        let seed = vm.constant(Constant::Int(3));
        let ok = vm.call_function(&f, &CallArgs::empty().positional(seed)).unwrap();
        assert_eq!(ok.first(), Some(&Value::Instance(int)));
    }

    #[test]
    fn test_call_non_callable() {
        let mut vm = Vm::new();
        let five = vm.constant(Constant::Int(5));
        let start = vm.node();
        let err = vm.call_function(&five, &CallArgs::empty()).unwrap_err();
        assert_eq!(
            err,
            DecorateError::NotCallable {
                value: "5".to_string(),
                span: Default::default(),
            }
        );
        assert_eq!(vm.node(), start);
    }

    #[test]
    fn test_unknown_class() {
        let vm = Vm::new();
        assert_eq!(
            vm.class(ClassId(7)).map(|c| c.id),
            Err(DecorateError::UnknownClass { id: 7 })
        );
    }
}
