//! Abstract values and variables
//!
//! A [`Variable`] is a set of [`Binding`]s, each pairing an abstract
//! [`Value`] with the program point where it was created.

use super::program::NodeId;
use crate::overlays::dataclass::FieldInstance;
use crate::types::{Type, TypeContext, TypeId};
use std::rc::Rc;

/// Literal constant
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Bool(bool),
    None,
}

impl Constant {
    /// Class of this constant
    pub fn type_id(&self, types: &TypeContext) -> TypeId {
        match self {
            Constant::Int(_) => types.int_type(),
            Constant::Float(_) => types.float_type(),
            Constant::Str(_) => types.str_type(),
            Constant::Bytes(_) => types.bytes_type(),
            Constant::Bool(_) => types.bool_type(),
            Constant::None => types.none_type(),
        }
    }

    /// Source-level representation
    pub fn repr(&self) -> String {
        match self {
            Constant::Int(v) => v.to_string(),
            Constant::Float(v) => format!("{:?}", v),
            Constant::Str(s) => format!("'{}'", s.replace('\'', "\\'")),
            Constant::Bytes(b) => format!("b'{}'", String::from_utf8_lossy(b)),
            Constant::Bool(true) => "True".to_string(),
            Constant::Bool(false) => "False".to_string(),
            Constant::None => "None".to_string(),
        }
    }
}

/// A function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeId,
    /// Absent means the parameter is required
    pub default: Option<Variable>,
}

/// Function signature
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub return_type: TypeId,
}

impl Signature {
    /// Number of parameters without a default
    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }

    /// Parameter names, in order
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Render as `(self, a: int, b: str = 'x') -> None`
    pub fn display(&self, types: &TypeContext) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                let mut s = format!("{}: {}", p.name, types.display(p.ty));
                if let Some(default) = &p.default {
                    s.push_str(" = ");
                    s.push_str(&default.describe(types));
                }
                s
            })
            .collect();
        format!("({}) -> {}", params.join(", "), types.display(self.return_type))
    }
}

/// Where a synthesized constructor takes an attribute's value from
#[derive(Debug, Clone, PartialEq)]
pub enum InitSource {
    /// `self.<attr> = <param>`
    Parameter(String),
    /// `self.<attr> = <default>`
    Default(Variable),
}

/// One statement of a synthesized constructor body
#[derive(Debug, Clone, PartialEq)]
pub struct InitAssignment {
    pub attribute: String,
    pub source: InitSource,
}

/// How a function came to exist
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionKind {
    /// Written in the class body
    Declared,
    /// Generated constructor with its assignment body
    Synthesized(Vec<InitAssignment>),
}

/// A function object
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub name: String,
    pub signature: Signature,
    pub kind: FunctionKind,
}

impl FunctionValue {
    /// A user-written function
    pub fn declared(name: impl Into<String>, params: Vec<Param>, return_type: TypeId) -> Self {
        FunctionValue {
            name: name.into(),
            signature: Signature { params, return_type },
            kind: FunctionKind::Declared,
        }
    }

    /// Check if this function was generated rather than written
    pub fn is_synthesized(&self) -> bool {
        matches!(self.kind, FunctionKind::Synthesized(_))
    }

    /// Body of a generated constructor
    pub fn init_body(&self) -> Option<&[InitAssignment]> {
        match &self.kind {
            FunctionKind::Synthesized(body) => Some(body),
            FunctionKind::Declared => None,
        }
    }
}

/// An abstract value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Literal constant
    Constant(Constant),
    /// Instance of a type
    Instance(TypeId),
    /// Class object whose instances have the given type
    Class(TypeId),
    /// Function object
    Function(Rc<FunctionValue>),
    /// Result of a `dataclasses.field(...)` call
    Field(Rc<FieldInstance>),
    /// Value the analyzer knows nothing about
    Unsolvable,
}

impl Value {
    /// Type of this value
    pub fn type_of(&self, types: &mut TypeContext) -> TypeId {
        match self {
            Value::Constant(c) => c.type_id(types),
            Value::Instance(ty) => *ty,
            Value::Class(ty) => types.class_object_type(*ty),
            Value::Function(f) => {
                let params = f.signature.params.iter().map(|p| p.ty).collect();
                types.callable_type(params, f.signature.return_type, f.signature.required_count())
            }
            Value::Field(_) | Value::Unsolvable => types.any_type(),
        }
    }

    /// Wrap this value in a single-binding variable
    pub fn to_variable(self, node: NodeId) -> Variable {
        Variable::from_value(self, node)
    }

    /// Check if this is the `None` constant
    pub fn is_none_constant(&self) -> bool {
        matches!(self, Value::Constant(Constant::None))
    }

    /// Short human-readable description
    pub fn describe(&self, types: &TypeContext) -> String {
        match self {
            Value::Constant(c) => c.repr(),
            Value::Instance(ty) => match types.get(*ty) {
                Some(Type::Any) => "Any".to_string(),
                _ => format!("{}()", types.display(*ty)),
            },
            Value::Class(ty) => types.display(*ty),
            Value::Function(f) => format!("<function {}>", f.name),
            Value::Field(_) => "field(...)".to_string(),
            Value::Unsolvable => "Any".to_string(),
        }
    }
}

/// A value together with the program point that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub node: NodeId,
}

/// Set of possible values for a name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    bindings: Vec<Binding>,
}

impl Variable {
    /// An empty variable
    pub fn new() -> Self {
        Self::default()
    }

    /// A variable with one binding
    pub fn from_value(value: Value, node: NodeId) -> Self {
        Variable {
            bindings: vec![Binding { value, node }],
        }
    }

    /// Add another possible value
    pub fn add_binding(&mut self, value: Value, node: NodeId) {
        self.bindings.push(Binding { value, node });
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// The values, without their program points
    pub fn data(&self) -> impl Iterator<Item = &Value> {
        self.bindings.iter().map(|b| &b.value)
    }

    /// The first value, if any
    pub fn first(&self) -> Option<&Value> {
        self.bindings.first().map(|b| &b.value)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Union of the types of all values
    pub fn type_of(&self, types: &mut TypeContext) -> TypeId {
        let members: Vec<TypeId> = self.bindings.iter().map(|b| b.value.type_of(types)).collect();
        types.union_type(members)
    }

    /// The field descriptor, if this variable holds the result of a field call
    pub fn as_field(&self) -> Option<&FieldInstance> {
        match self.first() {
            Some(Value::Field(field)) => Some(field),
            _ => None,
        }
    }

    /// Check if every value is the `None` constant
    pub fn is_none_constant(&self) -> bool {
        !self.is_empty() && self.data().all(Value::is_none_constant)
    }

    /// Human-readable description of the values
    pub fn describe(&self, types: &TypeContext) -> String {
        let values: Vec<String> = self.data().map(|v| v.describe(types)).collect();
        values.join(" | ")
    }
}
