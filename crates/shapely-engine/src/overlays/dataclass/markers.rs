//! Classification of annotated class members

use super::field::FieldInstance;
use crate::types::{names, TypeContext, TypeId};
use crate::vm::Variable;

/// How an annotated member takes part in the generated class
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    /// `ClassVar[T]`: class-level only, never an attribute
    ClassVar,
    /// `InitVar[T]`: constructor parameter of type `T`, not stored
    InitVar(TypeId),
    /// Assigned the result of `field(...)`
    Field(FieldInstance),
    /// Ordinary attribute
    Plain,
}

/// Classify a member from its annotation and assigned value
///
/// Markers are unwrapped one level only.
pub fn classify(types: &TypeContext, annotation: TypeId, orig: Option<&Variable>) -> MemberKind {
    if types.match_type_container(annotation, names::CLASS_VAR).is_some() {
        return MemberKind::ClassVar;
    }
    if let Some(inner) = types.match_type_container(annotation, names::INIT_VAR) {
        return MemberKind::InitVar(inner);
    }
    match orig.and_then(Variable::as_field) {
        Some(field) => MemberKind::Field(field.clone()),
        None => MemberKind::Plain,
    }
}
