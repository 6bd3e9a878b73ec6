//! `dataclasses.field(...)`

use crate::checker::{CheckWarning, DecorateError};
use crate::overlays::classgen;
use crate::vm::{CallArgs, Value, Variable, Vm};
use std::rc::Rc;

/// Qualified name used in error messages
const FIELD: &str = "dataclasses.field";

/// Keyword parameters accepted by `field`
const FIELD_KEYWORDS: &[&str] = &[
    "default",
    "default_factory",
    "init",
    "repr",
    "hash",
    "compare",
    "metadata",
];

/// Result of a `field(...)` call
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInstance {
    /// The effective default; unsolvable when the default is `None`,
    /// absent when neither a default nor a factory was given
    pub typ: Option<Variable>,
    /// Include the attribute as a constructor parameter
    pub init: bool,
    /// The explicit default, or the factory's result
    pub default: Option<Variable>,
}

/// Implements `dataclasses.field`
#[derive(Debug, Clone, Copy, Default)]
pub struct Field;

impl Field {
    pub fn new() -> Self {
        Field
    }

    /// Evaluate a `field(...)` call to a variable holding a [`FieldInstance`]
    pub fn call(&self, vm: &mut Vm, args: &CallArgs) -> Result<Variable, DecorateError> {
        classgen::match_args(FIELD, args, 0, FIELD_KEYWORDS)?;

        let default = self.get_default_var(vm, args)?;
        let init = self.get_init(vm, args);
        let typ = default.as_ref().map(|d| type_from_default(vm, d));

        let field = FieldInstance { typ, init, default };
        log::trace!("field(init={}, default={})", field.init, field.default.is_some());
        Ok(Variable::from_value(Value::Field(Rc::new(field)), vm.node()))
    }

    fn get_default_var(&self, vm: &mut Vm, args: &CallArgs) -> Result<Option<Variable>, DecorateError> {
        match (args.get("default"), args.get("default_factory")) {
            (Some(_), Some(_)) => Err(DecorateError::DuplicateKeyword {
                function: FIELD.to_string(),
                name: "default".to_string(),
                span: args.span,
            }),
            (Some(default), None) => Ok(Some(default.clone())),
            (None, Some(factory)) => {
                let call = CallArgs::empty().at(args.span);
                vm.call_function(factory, &call).map(Some)
            }
            (None, None) => Ok(None),
        }
    }

    // A non-constant `init` cannot be decided statically; assume the default
    fn get_init(&self, vm: &mut Vm, args: &CallArgs) -> bool {
        let Some(var) = args.get("init") else {
            return true;
        };
        match classgen::constant_bool(var) {
            Some(init) => init,
            None => {
                vm.errorlog.warn(CheckWarning::NonConstantKeyword {
                    name: "init".to_string(),
                    fallback: true,
                    span: args.span,
                });
                true
            }
        }
    }
}

/// A `None` default says nothing about the attribute's type
fn type_from_default(vm: &Vm, default: &Variable) -> Variable {
    if default.is_none_constant() {
        Variable::from_value(Value::Unsolvable, vm.node())
    } else {
        default.clone()
    }
}
