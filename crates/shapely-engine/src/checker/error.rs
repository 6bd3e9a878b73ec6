//! Error types for class decoration
//!
//! Fatal errors abort the decorator call that triggered them and are
//! returned as `Err`. Non-fatal errors and warnings are recorded in the
//! [`ErrorLog`](super::ErrorLog) and processing continues.

use crate::span::Span;
use crate::types::TypeError;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that abort a decorator or field-configuration call
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecorateError {
    /// Two mutually exclusive keyword arguments were both supplied
    #[error("Duplicate keyword argument '{name}' in call to {function}")]
    DuplicateKeyword {
        /// Function being called
        function: String,
        /// The conflicting parameter
        name: String,
        /// Location of the call
        span: Span,
    },

    /// Keyword arguments the callee does not accept
    #[error("Invalid keyword argument(s) {} in call to {function}", .names.join(", "))]
    WrongKeywordArgs {
        /// Function being called
        function: String,
        /// Unknown keyword names
        names: Vec<String>,
        /// Location of the call
        span: Span,
    },

    /// Wrong number of positional arguments
    #[error("Function {function} expects {expected} positional argument(s), got {actual}")]
    WrongArgCount {
        /// Function being called
        function: String,
        /// Number of arguments accepted
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
        /// Location of the call
        span: Span,
    },

    /// Value is not callable
    #[error("'{value}' is not callable")]
    NotCallable {
        /// Display form of the value
        value: String,
        /// Location of the call
        span: Span,
    },

    /// A keyword argument whose value must be a constant was not
    #[error("Keyword argument '{name}' to {function} must be a constant {expected}")]
    NonConstantKeyword {
        /// Function being called
        function: String,
        /// Keyword name
        name: String,
        /// Expected constant kind
        expected: String,
        /// Location of the call
        span: Span,
    },

    /// Class id does not refer to a class object
    #[error("Unknown class id {id}")]
    UnknownClass {
        /// Raw class id
        id: u32,
    },

    /// Type construction failed
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl DecorateError {
    /// Get the span associated with this error, if it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            DecorateError::DuplicateKeyword { span, .. } => Some(*span),
            DecorateError::WrongKeywordArgs { span, .. } => Some(*span),
            DecorateError::WrongArgCount { span, .. } => Some(*span),
            DecorateError::NotCallable { span, .. } => Some(*span),
            DecorateError::NonConstantKeyword { span, .. } => Some(*span),
            DecorateError::UnknownClass { .. } => None,
            DecorateError::Type(_) => None,
        }
    }
}

/// Non-fatal errors reported while processing a class
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// Default value does not match the attribute's declared type
    #[error("Type annotation for {name} does not match type of assignment")]
    AnnotationTypeMismatch {
        /// Attribute name
        name: String,
        /// Declared type (human-readable)
        annotation: String,
        /// Type of the offending value (human-readable)
        assigned: String,
        /// The offending value
        value: String,
        /// Location of the annotation
        span: Span,
    },

    /// A warning promoted to an error by configuration
    #[error("{message}")]
    DeniedWarning {
        /// Code of the promoted warning
        code: WarningCode,
        /// Warning message
        message: String,
        /// Location of the warning
        span: Span,
    },
}

impl CheckError {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            CheckError::AnnotationTypeMismatch { span, .. } => *span,
            CheckError::DeniedWarning { span, .. } => *span,
        }
    }
}

// ========================================================================
// Warnings
// ========================================================================

/// Warning codes for configurable warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// Name annotated more than once in one class body (W2001)
    DuplicateAnnotation,
    /// Required constructor parameter after a defaulted one (W2002)
    RequiredAfterDefault,
    /// Non-constant value for a boolean field option (W2003)
    NonConstantKeyword,
}

impl WarningCode {
    /// Get the warning code string (e.g., "W2001")
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::DuplicateAnnotation => "W2001",
            WarningCode::RequiredAfterDefault => "W2002",
            WarningCode::NonConstantKeyword => "W2003",
        }
    }

    /// Parse a warning code from its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "duplicate-annotation" => Some(WarningCode::DuplicateAnnotation),
            "required-after-default" => Some(WarningCode::RequiredAfterDefault),
            "non-constant-keyword" => Some(WarningCode::NonConstantKeyword),
            _ => None,
        }
    }
}

/// Warnings emitted while processing a class
#[derive(Debug, Clone, PartialEq)]
pub enum CheckWarning {
    /// The same name is annotated twice in one class body
    DuplicateAnnotation {
        /// Attribute name
        name: String,
        /// Location of the first annotation
        original: Span,
        /// Location of the repeated annotation
        duplicate: Span,
    },

    /// A required parameter follows a defaulted one in the synthesized constructor
    RequiredAfterDefault {
        /// Class name
        class: String,
        /// The required parameter
        name: String,
        /// Location of the class
        span: Span,
    },

    /// A boolean option was not a constant; its default was used instead
    NonConstantKeyword {
        /// Keyword name
        name: String,
        /// Value that was used instead
        fallback: bool,
        /// Location of the call
        span: Span,
    },
}

impl CheckWarning {
    /// Get the primary span associated with this warning
    pub fn span(&self) -> Span {
        match self {
            CheckWarning::DuplicateAnnotation { duplicate, .. } => *duplicate,
            CheckWarning::RequiredAfterDefault { span, .. } => *span,
            CheckWarning::NonConstantKeyword { span, .. } => *span,
        }
    }

    /// Get the warning code for this warning
    pub fn code(&self) -> WarningCode {
        match self {
            CheckWarning::DuplicateAnnotation { .. } => WarningCode::DuplicateAnnotation,
            CheckWarning::RequiredAfterDefault { .. } => WarningCode::RequiredAfterDefault,
            CheckWarning::NonConstantKeyword { .. } => WarningCode::NonConstantKeyword,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            CheckWarning::DuplicateAnnotation { name, .. } => {
                format!("Attribute '{}' is annotated more than once", name)
            }
            CheckWarning::RequiredAfterDefault { class, name, .. } => format!(
                "Required parameter '{}' follows a parameter with a default in {}.__init__",
                name, class
            ),
            CheckWarning::NonConstantKeyword { name, fallback, .. } => format!(
                "Keyword argument '{}' is not a constant; assuming {}",
                name,
                if *fallback { "True" } else { "False" }
            ),
        }
    }
}

/// Configuration for which warnings are enabled/disabled
#[derive(Debug, Clone)]
pub struct WarningConfig {
    /// Disabled warning codes (suppressed)
    pub disabled: HashSet<WarningCode>,
    /// Warnings promoted to errors
    pub deny: HashSet<WarningCode>,
    /// When true, ALL enabled warnings become errors
    pub strict: bool,
}

impl Default for WarningConfig {
    /// The structural checks are opt-in; the others are on
    fn default() -> Self {
        Self {
            disabled: [WarningCode::DuplicateAnnotation, WarningCode::RequiredAfterDefault]
                .into_iter()
                .collect(),
            deny: HashSet::new(),
            strict: false,
        }
    }
}

impl WarningConfig {
    /// Every warning enabled, none denied
    pub fn all() -> Self {
        Self {
            disabled: HashSet::new(),
            deny: HashSet::new(),
            strict: false,
        }
    }

    /// Strict mode: every warning enabled and treated as an error
    pub fn strict() -> Self {
        Self { strict: true, ..Self::all() }
    }

    /// Check if a warning should be emitted
    pub fn is_enabled(&self, code: WarningCode) -> bool {
        !self.disabled.contains(&code)
    }

    /// Check if a warning should be treated as an error
    pub fn is_denied(&self, code: WarningCode) -> bool {
        self.strict || self.deny.contains(&code)
    }
}
