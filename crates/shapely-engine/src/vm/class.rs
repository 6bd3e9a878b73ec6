//! Class objects
//!
//! A class records the annotate/assign operations of its body in source
//! order. Member tables and the ordered view used by class decorators are
//! derived from that record.

use super::program::NodeId;
use super::value::{FunctionValue, Value, Variable};
use super::Vm;
use crate::checker::DecorateError;
use crate::overlays::classgen::Attribute;
use crate::span::Span;
use crate::types::{ClassId, TypeId};
use indexmap::IndexMap;
use std::rc::Rc;

/// One recorded statement of a class body
#[derive(Debug, Clone, PartialEq)]
pub struct LocalOp {
    pub name: String,
    pub kind: LocalOpKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocalOpKind {
    /// `name: T`
    Annotate(TypeId),
    /// `name = value`
    Assign(Variable),
}

impl LocalOp {
    pub fn is_annotate(&self) -> bool {
        matches!(self.kind, LocalOpKind::Annotate(_))
    }

    pub fn is_assign(&self) -> bool {
        matches!(self.kind, LocalOpKind::Assign(_))
    }
}

/// Summary of one name declared in a class body
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLocal {
    /// Most recent annotation
    pub typ: Option<TypeId>,
    /// Most recently assigned value
    pub orig: Option<Variable>,
    /// Location of the first annotation, or of the first assignment if never annotated
    pub span: Span,
}

impl ClassLocal {
    fn is_method(&self) -> bool {
        matches!(
            self.orig.as_ref().and_then(Variable::first),
            Some(Value::Function(_))
        )
    }
}

/// Order in which [`ClassObject::class_locals`] reports names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Annotated names only, positioned by their first annotation
    FirstAnnotate,
    /// Assigned names only; reassignment moves a name to the end
    LastAssign,
}

/// Per-class data written by class decorators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMetadata {
    /// Merged attribute list written by `@dataclass`
    pub dataclass_fields: Option<Vec<Attribute>>,
}

/// A class object
#[derive(Debug, Clone)]
pub struct ClassObject {
    pub id: ClassId,
    pub name: String,
    /// Nominal type of instances
    pub ty: TypeId,
    /// Direct bases, in declaration order
    pub bases: Vec<ClassId>,
    /// Class-level attributes and methods
    pub members: IndexMap<String, Variable>,
    /// Per-instance annotations
    pub annotations: IndexMap<String, TypeId>,
    /// The class body, in source order
    pub local_ops: Vec<LocalOp>,
    pub metadata: ClassMetadata,
    /// Location of the class statement
    pub span: Span,
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

impl ClassObject {
    /// Check if `name` is defined in this class's own members
    pub fn has_own_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    fn local(&self, name: &str) -> ClassLocal {
        let mut local = ClassLocal {
            typ: None,
            orig: None,
            span: Span::default(),
        };
        let mut annotated = false;
        let mut seen = false;

        for op in self.local_ops.iter().filter(|op| op.name == name) {
            match &op.kind {
                LocalOpKind::Annotate(ty) => {
                    if !annotated {
                        local.span = op.span;
                        annotated = true;
                    }
                    local.typ = Some(*ty);
                }
                LocalOpKind::Assign(value) => {
                    if !seen && !annotated {
                        local.span = op.span;
                    }
                    local.orig = Some(value.clone());
                }
            }
            seen = true;
        }

        local
    }

    /// Names declared in the class body, skipping dunders
    ///
    /// With `allow_methods` false, unannotated functions are skipped too.
    pub fn class_locals(&self, allow_methods: bool, ordering: Ordering) -> IndexMap<String, ClassLocal> {
        let mut out: IndexMap<String, ClassLocal> = IndexMap::new();

        for op in &self.local_ops {
            if is_dunder(&op.name) {
                continue;
            }
            let local = self.local(&op.name);
            if !allow_methods && local.typ.is_none() && local.is_method() {
                continue;
            }
            match ordering {
                Ordering::FirstAnnotate => {
                    if !op.is_annotate() || out.contains_key(&op.name) {
                        continue;
                    }
                }
                Ordering::LastAssign => {
                    if !op.is_assign() {
                        continue;
                    }
                    out.shift_remove(&op.name);
                }
            }
            out.insert(op.name.clone(), local);
        }

        out
    }

    /// Names annotated more than once, with the first and second annotation spans
    pub fn duplicate_annotations(&self) -> Vec<(String, Span, Span)> {
        let mut first: IndexMap<&str, Span> = IndexMap::new();
        let mut duplicates = Vec::new();

        for op in self.local_ops.iter().filter(|op| op.is_annotate()) {
            match first.get(op.name.as_str()) {
                Some(&original) => {
                    if !duplicates.iter().any(|(n, _, _): &(String, Span, Span)| *n == op.name) {
                        duplicates.push((op.name.clone(), original, op.span));
                    }
                }
                None => {
                    first.insert(&op.name, op.span);
                }
            }
        }

        duplicates
    }
}

/// Storage for class objects, indexed by [`ClassId`]
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    classes: Vec<ClassObject>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassObject> {
        self.classes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassObject> {
        self.classes.get_mut(id.0 as usize)
    }

    /// Look up a class by name (the most recently defined one wins)
    pub fn by_name(&self, name: &str) -> Option<&ClassObject> {
        self.classes.iter().rev().find(|c| c.name == name)
    }

    fn next_id(&self) -> ClassId {
        ClassId(self.classes.len() as u32)
    }

    fn push(&mut self, class: ClassObject) {
        self.classes.push(class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Records a class body and creates the class object
///
/// ```ignore
/// let point = ClassBuilder::new("Point")
///     .annotate("x", int)
///     .declare("y", int, vm.constant(Constant::Int(0)))
///     .build(&mut vm)?;
/// ```
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    bases: Vec<ClassId>,
    ops: Vec<LocalOp>,
    span: Span,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ClassBuilder {
            name: name.into(),
            bases: Vec::new(),
            ops: Vec::new(),
            span: Span::new(0, 0, 1, 1),
        }
    }

    /// Add a direct base
    pub fn base(mut self, base: ClassId) -> Self {
        self.bases.push(base);
        self
    }

    /// Set the location of the class statement
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    // Body statements without an explicit span are placed one per line
    fn next_span(&self) -> Span {
        Span::new(0, 0, self.span.line + self.ops.len() as u32 + 1, 5)
    }

    /// `name: ty`
    pub fn annotate(self, name: impl Into<String>, ty: TypeId) -> Self {
        let span = self.next_span();
        self.annotate_at(name, ty, span)
    }

    /// `name: ty` at an explicit location
    pub fn annotate_at(mut self, name: impl Into<String>, ty: TypeId, span: Span) -> Self {
        self.ops.push(LocalOp {
            name: name.into(),
            kind: LocalOpKind::Annotate(ty),
            span,
        });
        self
    }

    /// `name = value`
    pub fn assign(mut self, name: impl Into<String>, value: Variable) -> Self {
        let span = self.next_span();
        self.ops.push(LocalOp {
            name: name.into(),
            kind: LocalOpKind::Assign(value),
            span,
        });
        self
    }

    /// `name: ty = value`
    pub fn declare(self, name: impl Into<String>, ty: TypeId, value: Variable) -> Self {
        let name = name.into();
        let span = self.next_span();
        let mut builder = self.annotate_at(name.clone(), ty, span);
        builder.ops.push(LocalOp {
            name,
            kind: LocalOpKind::Assign(value),
            span,
        });
        builder
    }

    /// `def <name>(...)`
    pub fn method(self, function: FunctionValue) -> Self {
        let name = function.name.clone();
        let value = Variable::from_value(Value::Function(Rc::new(function)), NodeId(0));
        self.assign(name, value)
    }

    /// Create the class object and register its name as a type
    pub fn build(self, vm: &mut Vm) -> Result<ClassId, DecorateError> {
        let id = vm.classes.next_id();

        let mut base_types = Vec::with_capacity(self.bases.len());
        for &base in &self.bases {
            base_types.push(vm.class(base)?.ty);
        }
        if base_types.is_empty() {
            base_types.push(vm.types.object_type());
        }

        let ty = vm.types.class_type(id, self.name.clone(), base_types);
        vm.types.register_named_type(self.name.clone(), ty);

        let mut members = IndexMap::new();
        let mut annotations = IndexMap::new();
        for op in &self.ops {
            match &op.kind {
                LocalOpKind::Annotate(t) => {
                    annotations.insert(op.name.clone(), *t);
                }
                LocalOpKind::Assign(value) => {
                    members.insert(op.name.clone(), value.clone());
                }
            }
        }

        log::trace!("defined class {} as {} with {} body ops", self.name, id, self.ops.len());

        vm.classes.push(ClassObject {
            id,
            name: self.name,
            ty,
            bases: self.bases,
            members,
            annotations,
            local_ops: self.ops,
            metadata: ClassMetadata::default(),
            span: self.span,
        });

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::value::Constant;

    fn int_value(vm: &Vm, v: i64) -> Variable {
        Variable::from_value(Value::Constant(Constant::Int(v)), vm.node())
    }

    #[test]
    fn test_first_annotate_ignores_reassignment() {
        let mut vm = Vm::new();
        let int = vm.types.int_type();
        let str_ty = vm.types.str_type();
        let ten = int_value(&vm, 10);
        let cls = ClassBuilder::new("A")
            .annotate("x", int)
            .annotate("y", str_ty)
            .assign("x", ten.clone())
            .build(&mut vm)
            .unwrap();

        let locals = vm.class(cls).unwrap().class_locals(true, Ordering::FirstAnnotate);
        let names: Vec<&str> = locals.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(locals["x"].orig, Some(ten));
        assert_eq!(locals["y"].orig, None);
    }

    #[test]
    fn test_first_annotate_skips_unannotated_and_dunders() {
        let mut vm = Vm::new();
        let int = vm.types.int_type();
        let one = int_value(&vm, 1);
        let cls = ClassBuilder::new("A")
            .assign("plain", one.clone())
            .annotate("__slots__", int)
            .annotate("x", int)
            .build(&mut vm)
            .unwrap();

        let locals = vm.class(cls).unwrap().class_locals(true, Ordering::FirstAnnotate);
        assert_eq!(locals.keys().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_last_assign_moves_to_end() {
        let mut vm = Vm::new();
        let one = int_value(&vm, 1);
        let two = int_value(&vm, 2);
        let cls = ClassBuilder::new("A")
            .assign("a", one.clone())
            .assign("b", one)
            .assign("a", two.clone())
            .build(&mut vm)
            .unwrap();

        let locals = vm.class(cls).unwrap().class_locals(true, Ordering::LastAssign);
        assert_eq!(locals.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(locals["a"].orig, Some(two));
    }

    #[test]
    fn test_allow_methods() {
        let mut vm = Vm::new();
        let none = vm.types.none_type();
        let one = int_value(&vm, 1);
        let cls = ClassBuilder::new("A")
            .method(FunctionValue::declared("run", vec![], none))
            .assign("x", one)
            .build(&mut vm)
            .unwrap();

        let class = vm.class(cls).unwrap();
        assert_eq!(class.class_locals(true, Ordering::LastAssign).len(), 2);
        assert_eq!(
            class.class_locals(false, Ordering::LastAssign).keys().collect::<Vec<_>>(),
            vec!["x"]
        );
    }

    #[test]
    fn test_duplicate_annotations() {
        let mut vm = Vm::new();
        let int = vm.types.int_type();
        let str_ty = vm.types.str_type();
        let cls = ClassBuilder::new("A")
            .annotate_at("x", int, Span::new(0, 0, 2, 5))
            .annotate("y", int)
            .annotate_at("x", str_ty, Span::new(0, 0, 4, 5))
            .build(&mut vm)
            .unwrap();

        let class = vm.class(cls).unwrap();
        assert_eq!(
            class.duplicate_annotations(),
            vec![("x".to_string(), Span::new(0, 0, 2, 5), Span::new(0, 0, 4, 5))]
        );
        // Last annotation wins for the type
        assert_eq!(class.annotations["x"], str_ty);
        assert_eq!(
            class.class_locals(true, Ordering::FirstAnnotate)["x"].typ,
            Some(str_ty)
        );
    }

    #[test]
    fn test_build_registers_type() {
        let mut vm = Vm::new();
        let base = ClassBuilder::new("Base").build(&mut vm).unwrap();
        let child = ClassBuilder::new("Child").base(base).build(&mut vm).unwrap();

        let child_ty = vm.class(child).unwrap().ty;
        assert_eq!(vm.types.lookup_named_type("Child"), Some(child_ty));
        assert_eq!(vm.classes.by_name("Base").map(|c| c.id), Some(base));
        assert!(ClassBuilder::new("Bad")
            .base(ClassId(99))
            .build(&mut vm)
            .is_err());
    }
}
