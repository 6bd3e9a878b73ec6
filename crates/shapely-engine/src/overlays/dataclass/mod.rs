//! The `@dataclass` decorator
//!
//! Decorating a class collects its annotated members into an ordered
//! attribute list, merges it with the lists of its dataclass ancestors,
//! stores the result on the class, and synthesizes `__init__` unless the
//! class already defines one.
//!
//! ```ignore
//! let mut vm = Vm::new();
//! let int = vm.types.int_type();
//! let point = ClassBuilder::new("Point")
//!     .annotate("x", int)
//!     .annotate("y", int)
//!     .build(&mut vm)?;
//!
//! let node = Dataclass::new().decorate(&mut vm, point)?;
//! ```

pub mod field;
pub mod markers;

pub use field::{Field, FieldInstance};
pub use markers::{classify, MemberKind};

use crate::checker::{CheckWarning, DecorateError};
use crate::overlays::classgen::{self, Attribute};
use crate::span::Span;
use crate::types::{ClassId, Type, TypeId};
use crate::vm::{CallArgs, NodeId, Ordering, Value, Variable, Vm};
use rustc_hash::FxHashMap;

/// Qualified name used in error messages
const DATACLASS: &str = "dataclasses.dataclass";

/// Keyword options accepted by `@dataclass(...)`
const DATACLASS_KEYWORDS: &[&str] = &["init", "repr", "eq", "order", "unsafe_hash", "frozen"];

/// Parsed options of one `@dataclass(...)` application
///
/// Only `init` changes what is synthesized; the rest are recorded so that
/// the decorator accepts exactly the keywords the runtime does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataclassOptions {
    pub init: bool,
    pub repr: bool,
    pub eq: bool,
    pub order: bool,
    pub unsafe_hash: bool,
    pub frozen: bool,
}

impl Default for DataclassOptions {
    fn default() -> Self {
        Self {
            init: true,
            repr: true,
            eq: true,
            order: false,
            unsafe_hash: false,
            frozen: false,
        }
    }
}

impl DataclassOptions {
    /// Parse keyword options; every value must be a boolean constant
    pub fn from_args(args: &CallArgs) -> Result<Self, DecorateError> {
        classgen::match_args(DATACLASS, args, 1, DATACLASS_KEYWORDS)?;

        let mut options = DataclassOptions::default();
        for (name, value) in &args.namedargs {
            let parsed = classgen::constant_bool(value).ok_or_else(|| DecorateError::NonConstantKeyword {
                function: DATACLASS.to_string(),
                name: name.clone(),
                expected: "bool".to_string(),
                span: args.span,
            })?;
            match name.as_str() {
                "init" => options.init = parsed,
                "repr" => options.repr = parsed,
                "eq" => options.eq = parsed,
                "order" => options.order = parsed,
                "unsafe_hash" => options.unsafe_hash = parsed,
                "frozen" => options.frozen = parsed,
                _ => {}
            }
        }
        Ok(options)
    }
}

/// Implements `@dataclass`
#[derive(Debug, Clone, Default)]
pub struct Dataclass {
    /// Options of the most recent `@dataclass(...)` call not yet applied
    pending: DataclassOptions,
    /// Options each decorated class was processed with
    args: FxHashMap<ClassId, DataclassOptions>,
}

impl Dataclass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a call of the decorator
    ///
    /// `dataclass(cls)` decorates `cls` at once and returns the resulting
    /// program point. `dataclass(**options)` records the options for the
    /// next [`apply`](Self::apply) and returns `None`.
    pub fn call(&mut self, vm: &mut Vm, args: &CallArgs) -> Result<Option<NodeId>, DecorateError> {
        let options = DataclassOptions::from_args(args)?;
        let Some(target) = args.posargs.first() else {
            self.pending = options;
            return Ok(None);
        };

        let cls = class_id_of(vm, target).ok_or_else(|| DecorateError::NotCallable {
            value: format!("dataclass({})", target.describe(&vm.types)),
            span: args.span,
        })?;
        self.args.insert(cls, options);
        self.decorate(vm, cls).map(Some)
    }

    /// Apply the pending options to `cls` and decorate it
    pub fn apply(&mut self, vm: &mut Vm, cls: ClassId) -> Result<NodeId, DecorateError> {
        self.args.insert(cls, self.pending);
        self.pending = DataclassOptions::default();
        self.decorate(vm, cls)
    }

    /// Options `cls` is decorated with
    pub fn options(&self, cls: ClassId) -> DataclassOptions {
        self.args.get(&cls).copied().unwrap_or_default()
    }

    /// Process the members of `cls`
    ///
    /// Returns the program point after processing. Type mismatches between
    /// defaults and annotations are logged, not returned.
    pub fn decorate(&self, vm: &mut Vm, cls: ClassId) -> Result<NodeId, DecorateError> {
        let options = self.options(cls);
        let (class_name, class_span, locals, duplicates) = {
            let class = vm.class(cls)?;
            (
                class.name.clone(),
                class.span,
                class.class_locals(true, Ordering::FirstAnnotate),
                class.duplicate_annotations(),
            )
        };
        log::debug!("decorating dataclass {} ({} annotated locals)", class_name, locals.len());

        for (name, original, duplicate) in duplicates {
            vm.errorlog.warn(CheckWarning::DuplicateAnnotation {
                name,
                original,
                duplicate,
            });
        }

        let mut own_attrs = Vec::with_capacity(locals.len());
        for (name, local) in locals {
            let Some(annotation) = local.typ else {
                continue;
            };

            let (ty, init, default) = match classify(&vm.types, annotation, local.orig.as_ref()) {
                MemberKind::ClassVar => continue,
                MemberKind::InitVar(inner) => {
                    self.handle_initvar(vm, cls, &name, inner, local.orig.is_some())?;
                    vm.instantiate(inner);
                    (inner, true, local.orig)
                }
                MemberKind::Field(field) => {
                    self.set_member(vm, cls, &name, annotation)?;
                    let default = if field.default.is_some() { field.typ } else { None };
                    (annotation, field.init, default)
                }
                MemberKind::Plain => {
                    self.set_member(vm, cls, &name, annotation)?;
                    (annotation, true, local.orig)
                }
            };

            self.check_default(vm, &name, ty, default.as_ref(), local.span);

            log::trace!(
                "{}.{}: {} (init={}, default={})",
                class_name,
                name,
                vm.types.display(ty),
                init,
                default.is_some()
            );
            own_attrs.push(Attribute { name, ty, init, default });
        }

        let mut attrs = classgen::get_base_class_attrs(vm, cls)?;
        for attr in own_attrs {
            classgen::merge_attr(&mut attrs, attr);
        }

        if let Some(attr) = classgen::required_after_default(&attrs) {
            let warning = CheckWarning::RequiredAfterDefault {
                class: class_name.clone(),
                name: attr.name.clone(),
                span: class_span,
            };
            vm.errorlog.warn(warning);
        }

        vm.class_mut(cls)?.metadata.dataclass_fields = Some(attrs.clone());

        // An explicit __init__ is never overwritten
        if options.init && !vm.class(cls)?.has_own_member("__init__") {
            let init_method = classgen::make_init(vm, cls, &attrs)?;
            vm.class_mut(cls)?.members.insert("__init__".to_string(), init_method);
            log::debug!("synthesized {}.__init__ with {} attribute(s)", class_name, attrs.len());
        }

        Ok(vm.node())
    }

    /// Report the first binding of `default` that does not match `ty`
    fn check_default(&self, vm: &mut Vm, name: &str, ty: TypeId, default: Option<&Variable>, span: Span) {
        let Some(default) = default else {
            return;
        };
        let node = vm.node();
        let bad = vm.matcher().bad_matches(default, ty, node);
        if let Some(first) = bad.first() {
            vm.errorlog.annotation_type_mismatch(&vm.types, first, name, span);
        }
    }

    /// Without a default an `InitVar` is not stored; with one, its annotation
    /// becomes the unwrapped type
    fn handle_initvar(
        &self,
        vm: &mut Vm,
        cls: ClassId,
        name: &str,
        inner: TypeId,
        has_default: bool,
    ) -> Result<(), DecorateError> {
        let class = vm.class_mut(cls)?;
        if has_default {
            class.annotations.insert(name.to_string(), inner);
        } else {
            class.annotations.shift_remove(name);
            class.members.shift_remove(name);
        }
        Ok(())
    }

    fn set_member(&self, vm: &mut Vm, cls: ClassId, name: &str, ty: TypeId) -> Result<(), DecorateError> {
        let value = vm.instance(ty);
        vm.class_mut(cls)?.members.insert(name.to_string(), value);
        Ok(())
    }
}

fn class_id_of(vm: &Vm, var: &Variable) -> Option<ClassId> {
    match var.first()? {
        Value::Class(ty) => match vm.types.get(*ty)? {
            Type::Class(class) => Some(class.id),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::Constant;

    #[test]
    fn test_options_default() {
        let options = DataclassOptions::default();
        assert!(options.init && options.repr && options.eq);
        assert!(!options.order && !options.unsafe_hash && !options.frozen);
    }

    #[test]
    fn test_options_parse() {
        let vm = Vm::new();
        let args = CallArgs::empty()
            .keyword("init", vm.constant(Constant::Bool(false)))
            .keyword("frozen", vm.constant(Constant::Bool(true)));
        let options = DataclassOptions::from_args(&args).unwrap();
        assert!(!options.init);
        assert!(options.frozen);
    }

    #[test]
    fn test_options_reject_non_constant() {
        let vm = Vm::new();
        let bool_ty = vm.types.bool_type();
        let args = CallArgs::empty().keyword("eq", vm.instance(bool_ty));
        assert!(matches!(
            DataclassOptions::from_args(&args),
            Err(DecorateError::NonConstantKeyword { ref name, .. }) if name == "eq"
        ));
    }

    #[test]
    fn test_options_reject_unknown() {
        let vm = Vm::new();
        let args = CallArgs::empty().keyword("slots", vm.constant(Constant::Bool(true)));
        assert!(matches!(
            DataclassOptions::from_args(&args),
            Err(DecorateError::WrongKeywordArgs { .. })
        ));
    }

    #[test]
    fn test_call_with_non_class() {
        let mut vm = Vm::new();
        let args = CallArgs::empty().positional(vm.constant(Constant::Int(1)));
        assert!(matches!(
            Dataclass::new().call(&mut vm, &args),
            Err(DecorateError::NotCallable { .. })
        ));
    }
}
