//! Call arguments

use super::value::Variable;
use crate::span::Span;
use indexmap::IndexMap;

/// Arguments of a call, as seen by the callee
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub posargs: Vec<Variable>,
    /// Keyword arguments in call order
    pub namedargs: IndexMap<String, Variable>,
    /// Location of the call
    pub span: Span,
}

impl CallArgs {
    /// A call with no arguments
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a positional argument
    pub fn positional(mut self, value: Variable) -> Self {
        self.posargs.push(value);
        self
    }

    /// Add a keyword argument
    pub fn keyword(mut self, name: impl Into<String>, value: Variable) -> Self {
        self.namedargs.insert(name.into(), value);
        self
    }

    /// Set the call location
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.namedargs.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.namedargs.contains_key(name)
    }
}
