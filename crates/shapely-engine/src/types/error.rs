//! Type system errors

use thiserror::Error;

/// Errors that can occur while building or resolving types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// Undefined type reference
    #[error("Undefined type: {name}")]
    UndefinedType {
        /// Type name that was not found
        name: String,
    },

    /// Named type is not a parameterizable container
    #[error("'{name}' is not a generic container")]
    NotGeneric {
        /// Type name
        name: String,
    },

    /// Invalid type argument count
    #[error("'{name}' expects {expected} type argument(s), got {actual}")]
    InvalidTypeArgCount {
        /// Container name
        name: String,
        /// Expected count
        expected: usize,
        /// Actual count
        actual: usize,
    },
}
