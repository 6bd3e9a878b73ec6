//! Sink for non-fatal errors and warnings

use super::error::{CheckError, CheckWarning, WarningConfig};
use crate::span::Span;
use crate::types::TypeContext;
use crate::vm::BadMatch;

/// Collects the errors and warnings of an analysis run
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    errors: Vec<CheckError>,
    warnings: Vec<CheckWarning>,
    config: WarningConfig,
}

impl ErrorLog {
    pub fn new(config: WarningConfig) -> Self {
        ErrorLog {
            errors: Vec::new(),
            warnings: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &WarningConfig {
        &self.config
    }

    /// Record that a default value does not match its attribute's annotation
    pub fn annotation_type_mismatch(&mut self, types: &TypeContext, bad: &BadMatch, name: &str, span: Span) {
        let error = CheckError::AnnotationTypeMismatch {
            name: name.to_string(),
            annotation: types.display(bad.expected),
            assigned: types.display(bad.actual),
            value: bad.binding.value.describe(types),
            span,
        };
        log::trace!("error: {}", error);
        self.errors.push(error);
    }

    /// Record a warning, honoring the warning configuration
    pub fn warn(&mut self, warning: CheckWarning) {
        let code = warning.code();
        if !self.config.is_enabled(code) {
            return;
        }
        if self.config.is_denied(code) {
            self.errors.push(CheckError::DeniedWarning {
                code,
                message: warning.message(),
                span: warning.span(),
            });
        } else {
            self.warnings.push(warning);
        }
    }

    pub fn errors(&self) -> &[CheckError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[CheckWarning] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
