//! Assignability between types
//!
//! Implements the relation T ~> U (a value of type T may be stored where U is
//! declared). This is what default values are checked against.

use super::context::TypeContext;
use super::ty::{PrimitiveType, Type, TypeId};

/// Context for checking assignability
#[derive(Debug)]
pub struct AssignabilityContext<'a> {
    /// Type context for resolving types
    type_ctx: &'a TypeContext,
}

impl<'a> AssignabilityContext<'a> {
    /// Create a new assignability context
    pub fn new(type_ctx: &'a TypeContext) -> Self {
        AssignabilityContext { type_ctx }
    }

    /// Check if `source` is assignable to `target` (source ~> target)
    ///
    /// - `Any` matches in both directions, `nothing` is assignable to everything
    /// - every type is assignable to `object`
    /// - numeric tower: bool ~> int ~> float ~> complex
    /// - classes are nominal through their bases
    /// - generic containers are invariant, except that `Any` arguments and
    ///   bare (unparameterized) containers match anything
    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        // Reflexivity
        if source == target {
            return true;
        }

        let source_ty = match self.type_ctx.get(source) {
            Some(ty) => ty,
            None => return false,
        };

        let target_ty = match self.type_ctx.get(target) {
            Some(ty) => ty,
            None => return false,
        };

        match (source_ty, target_ty) {
            (Type::Any, _) | (_, Type::Any) => true,

            (Type::Never, _) => true,

            // Union assignability: T1 | ... | Tn ~> U if Ti ~> U for all i
            (Type::Union(union), _) => union
                .members
                .iter()
                .all(|&member| self.is_assignable(member, target)),

            // Assignability to union: T ~> U1 | ... | Un if T ~> Ui for some i
            (_, Type::Union(union)) => union
                .members
                .iter()
                .any(|&member| self.is_assignable(source, member)),

            (_, Type::Primitive(PrimitiveType::Object)) => true,

            (Type::Primitive(p1), Type::Primitive(p2)) => {
                match (p1.numeric_rank(), p2.numeric_rank()) {
                    (Some(r1), Some(r2)) => r1 <= r2,
                    _ => p1 == p2,
                }
            }

            // Nominal: a class is assignable to anything one of its bases is
            (Type::Class(c1), _) => {
                if let Type::Class(c2) = target_ty {
                    if c1.id == c2.id {
                        return true;
                    }
                }
                c1.bases.iter().any(|&base| self.is_assignable(base, target))
            }

            (Type::Generic(g1), Type::Generic(g2)) => {
                if g1.base != g2.base {
                    return false;
                }
                if g1.type_args.is_empty() || g2.type_args.is_empty() {
                    return true;
                }
                if g1.type_args.len() != g2.type_args.len() {
                    return false;
                }

                // Invariant, with Any as a wildcard
                g1.type_args.iter().zip(&g2.type_args).all(|(&a1, &a2)| {
                    a1 == a2 || self.is_any(a1) || self.is_any(a2)
                })
            }

            // Parameters are contravariant, the return type is covariant
            (Type::Callable(f1), Type::Callable(f2)) => {
                if f1.params.len() != f2.params.len() {
                    return false;
                }

                let params_match = f1
                    .params
                    .iter()
                    .zip(&f2.params)
                    .all(|(&p1, &p2)| self.is_assignable(p2, p1));

                params_match && self.is_assignable(f1.return_type, f2.return_type)
            }

            _ => false,
        }
    }

    fn is_any(&self, id: TypeId) -> bool {
        matches!(self.type_ctx.get(id), Some(Type::Any))
    }
}
