//! Matching abstract values against declared types

use super::program::{NodeId, Program};
use super::value::{Binding, Variable};
use crate::types::{AssignabilityContext, TypeContext, TypeId};

/// A binding whose value is not assignable to the declared type
#[derive(Debug, Clone, PartialEq)]
pub struct BadMatch {
    pub binding: Binding,
    /// The declared type
    pub expected: TypeId,
    /// The binding's type
    pub actual: TypeId,
}

/// Checks variables against declared types
pub struct Matcher<'a> {
    types: &'a mut TypeContext,
    program: &'a Program,
}

impl<'a> Matcher<'a> {
    pub fn new(types: &'a mut TypeContext, program: &'a Program) -> Self {
        Matcher { types, program }
    }

    /// Bindings of `var` visible at `node` that do not match `declared`
    ///
    /// Bindings created on a path that cannot reach `node` are ignored.
    pub fn bad_matches(&mut self, var: &Variable, declared: TypeId, node: NodeId) -> Vec<BadMatch> {
        let mut bad = Vec::new();

        for binding in var.bindings() {
            if !self.program.is_reachable(binding.node, node) {
                continue;
            }
            let actual = binding.value.type_of(self.types);
            let mut assign_ctx = AssignabilityContext::new(self.types);
            if !assign_ctx.is_assignable(actual, declared) {
                bad.push(BadMatch {
                    binding: binding.clone(),
                    expected: declared,
                    actual,
                });
            }
        }

        bad
    }
}
