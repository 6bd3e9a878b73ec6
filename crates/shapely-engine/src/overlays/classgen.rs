//! Machinery shared by class-generating decorators
//!
//! Attributes, inherited-attribute lookup, constructor synthesis and the
//! argument checks common to decorator and field calls.

use crate::checker::DecorateError;
use crate::types::{ClassId, TypeContext, TypeId};
use crate::vm::{
    CallArgs, Constant, FunctionKind, FunctionValue, InitAssignment, InitSource, Param, Signature, Value, Variable, Vm,
};
use serde::{Deserialize, Serialize};

/// One synthesized constructor parameter / instance slot
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub ty: TypeId,
    /// Included as a constructor parameter
    pub init: bool,
    /// Absent means the parameter is required
    pub default: Option<Variable>,
}

impl Attribute {
    /// Render with display strings, for reports and assertions
    pub fn summary(&self, types: &TypeContext) -> AttributeSummary {
        AttributeSummary {
            name: self.name.clone(),
            ty: types.display(self.ty),
            init: self.init,
            default: self.default.as_ref().map(|d| d.describe(types)),
        }
    }
}

/// Display form of an [`Attribute`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub init: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Add `attr` to `attrs`, replacing a same-name entry in place
pub fn merge_attr(attrs: &mut Vec<Attribute>, attr: Attribute) {
    match attrs.iter_mut().find(|a| a.name == attr.name) {
        Some(slot) => *slot = attr,
        None => attrs.push(attr),
    }
}

/// Attributes inherited from the bases of `cls`
///
/// Bases are visited in declaration order. A base that was never decorated
/// contributes the attributes of its own nearest decorated ancestors.
pub fn get_base_class_attrs(vm: &Vm, cls: ClassId) -> Result<Vec<Attribute>, DecorateError> {
    let mut attrs = Vec::new();
    for &base in &vm.class(cls)?.bases {
        for attr in inherited_attrs(vm, base)? {
            merge_attr(&mut attrs, attr);
        }
    }
    Ok(attrs)
}

fn inherited_attrs(vm: &Vm, cls: ClassId) -> Result<Vec<Attribute>, DecorateError> {
    let class = vm.class(cls)?;
    match &class.metadata.dataclass_fields {
        Some(fields) => Ok(fields.clone()),
        None => get_base_class_attrs(vm, cls),
    }
}

/// The first required init parameter that follows a defaulted one
pub fn required_after_default(attrs: &[Attribute]) -> Option<&Attribute> {
    let mut seen_default = false;
    for attr in attrs.iter().filter(|a| a.init) {
        if attr.default.is_some() {
            seen_default = true;
        } else if seen_default {
            return Some(attr);
        }
    }
    None
}

/// Build `__init__` for `cls` from its merged attribute list
///
/// Parameters are `self` followed by every init attribute. The body assigns
/// each parameter to its attribute, then sets non-init attributes that have
/// a default.
pub fn make_init(vm: &mut Vm, cls: ClassId, attrs: &[Attribute]) -> Result<Variable, DecorateError> {
    let self_ty = vm.class(cls)?.ty;
    let mut params = vec![Param {
        name: "self".to_string(),
        ty: self_ty,
        default: None,
    }];
    let mut body = Vec::new();

    for attr in attrs {
        if attr.init {
            params.push(Param {
                name: attr.name.clone(),
                ty: attr.ty,
                default: attr.default.clone(),
            });
            body.push(InitAssignment {
                attribute: attr.name.clone(),
                source: InitSource::Parameter(attr.name.clone()),
            });
        } else if let Some(default) = &attr.default {
            body.push(InitAssignment {
                attribute: attr.name.clone(),
                source: InitSource::Default(default.clone()),
            });
        }
    }

    let init = FunctionValue {
        name: "__init__".to_string(),
        signature: Signature {
            params,
            return_type: vm.types.none_type(),
        },
        kind: FunctionKind::Synthesized(body),
    };
    Ok(vm.function(init))
}

/// Reject positional arguments beyond `max_positional` and unknown keywords
pub fn match_args(
    function: &str,
    args: &CallArgs,
    max_positional: usize,
    keywords: &[&str],
) -> Result<(), DecorateError> {
    if args.posargs.len() > max_positional {
        return Err(DecorateError::WrongArgCount {
            function: function.to_string(),
            expected: max_positional,
            actual: args.posargs.len(),
            span: args.span,
        });
    }

    let unknown: Vec<String> = args
        .namedargs
        .keys()
        .filter(|name| !keywords.contains(&name.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(DecorateError::WrongKeywordArgs {
            function: function.to_string(),
            names: unknown,
            span: args.span,
        });
    }

    Ok(())
}

/// The value of a variable that holds exactly one boolean constant
pub fn constant_bool(var: &Variable) -> Option<bool> {
    match var.bindings() {
        [binding] => match binding.value {
            Value::Constant(Constant::Bool(b)) => Some(b),
            _ => None,
        },
        _ => None,
    }
}
