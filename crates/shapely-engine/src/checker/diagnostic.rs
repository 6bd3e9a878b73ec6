//! Diagnostic rendering
//!
//! Turns recorded errors and warnings into codespan diagnostics for the
//! terminal, or into JSON for editor integrations.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::Files;
pub use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use super::error::{CheckError, CheckWarning, DecorateError};
use crate::span::Span;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    /// Error or warning code (e.g., "E4001")
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::primary(file_id, span.start..span.end).with_message(message));
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::secondary(file_id, span.start..span.end).with_message(message));
        self
    }

    /// Add a note (additional context)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create diagnostic from a CheckError
    pub fn from_check_error(error: &CheckError, file_id: usize) -> Self {
        match error {
            CheckError::AnnotationTypeMismatch {
                name,
                annotation,
                assigned,
                value,
                span,
            } => Diagnostic::error(error.to_string())
                .with_code(error_code(error))
                .with_primary_label(file_id, *span, format!("'{}' is declared as '{}'", name, annotation))
                .with_note(format!("Annotation: {}", annotation))
                .with_note(format!("Assignment: {} (value {})", assigned, value)),
            CheckError::DeniedWarning { code, message, span } => Diagnostic::error(message.clone())
                .with_code(ErrorCode(code.as_str()))
                .with_primary_label(file_id, *span, "warning denied by configuration"),
        }
    }

    /// Create diagnostic from a warning
    pub fn from_warning(warning: &CheckWarning, file_id: usize) -> Self {
        let diag = Diagnostic::warning(warning.message()).with_code(ErrorCode(warning.code().as_str()));
        match warning {
            CheckWarning::DuplicateAnnotation {
                original, duplicate, ..
            } => diag
                .with_primary_label(file_id, *duplicate, "annotated again here")
                .with_secondary_label(file_id, *original, "first annotation here"),
            CheckWarning::RequiredAfterDefault { span, .. } => diag
                .with_primary_label(file_id, *span, "in this class")
                .with_help("give the parameter a default or move it before defaulted attributes"),
            CheckWarning::NonConstantKeyword { span, .. } => {
                diag.with_primary_label(file_id, *span, "expected True or False")
            }
        }
    }

    /// Create diagnostic from a DecorateError
    pub fn from_decorate_error(error: &DecorateError, file_id: usize) -> Self {
        let diag = Diagnostic::error(error.to_string()).with_code(decorate_error_code(error));
        let label = match error {
            DecorateError::DuplicateKeyword { .. } => "conflicting keyword arguments",
            DecorateError::WrongKeywordArgs { .. } => "unexpected keyword argument",
            DecorateError::WrongArgCount { .. } => "incorrect number of arguments",
            DecorateError::NotCallable { .. } => "cannot be called",
            DecorateError::NonConstantKeyword { .. } => "expected a constant",
            DecorateError::UnknownClass { .. } | DecorateError::Type(_) => return diag,
        };
        match error.span() {
            Some(span) => diag.with_primary_label(file_id, span, label),
            None => diag,
        }
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        self.emit_to(&mut writer, files)
    }

    /// Emit the diagnostic to any writer
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        let json_diag = JsonDiagnostic::from_diagnostic(self, files);
        serde_json::to_string_pretty(&json_diag)
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E4001")
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    pub message: Option<String>,
    /// "primary" or "secondary"
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get error code for a CheckError
pub fn error_code(error: &CheckError) -> ErrorCode {
    match error {
        CheckError::AnnotationTypeMismatch { .. } => ErrorCode("E4001"),
        CheckError::DeniedWarning { code, .. } => ErrorCode(code.as_str()),
    }
}

/// Get error code for a DecorateError
pub fn decorate_error_code(error: &DecorateError) -> ErrorCode {
    match error {
        DecorateError::DuplicateKeyword { .. } => ErrorCode("E4002"),
        DecorateError::WrongKeywordArgs { .. } => ErrorCode("E4003"),
        DecorateError::WrongArgCount { .. } => ErrorCode("E4004"),
        DecorateError::NotCallable { .. } => ErrorCode("E4005"),
        DecorateError::NonConstantKeyword { .. } => ErrorCode("E4006"),
        DecorateError::UnknownClass { .. } => ErrorCode("E4007"),
        DecorateError::Type(_) => ErrorCode("E4008"),
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::WarningCode;

    fn mismatch() -> CheckError {
        CheckError::AnnotationTypeMismatch {
            name: "x".to_string(),
            annotation: "int".to_string(),
            assigned: "str".to_string(),
            value: "'hello'".to_string(),
            span: Span::new(14, 20, 2, 5),
        }
    }

    #[test]
    fn test_from_check_error_mismatch() {
        let diag = Diagnostic::from_check_error(&mismatch(), 0);
        assert_eq!(diag.inner.severity, Severity::Error);
        assert_eq!(diag.code, Some(ErrorCode("E4001")));
        assert_eq!(diag.inner.message, "Type annotation for x does not match type of assignment");
        assert_eq!(diag.inner.notes.len(), 2);
    }

    #[test]
    fn test_denied_warning_keeps_warning_code() {
        let error = CheckError::DeniedWarning {
            code: WarningCode::RequiredAfterDefault,
            message: "msg".to_string(),
            span: Span::default(),
        };
        let diag = Diagnostic::from_check_error(&error, 0);
        assert_eq!(diag.inner.severity, Severity::Error);
        assert_eq!(diag.code, Some(ErrorCode("W2002")));
    }

    #[test]
    fn test_duplicate_annotation_has_two_labels() {
        let warning = CheckWarning::DuplicateAnnotation {
            name: "x".to_string(),
            original: Span::new(14, 15, 2, 5),
            duplicate: Span::new(26, 27, 3, 5),
        };
        let diag = Diagnostic::from_warning(&warning, 0);
        assert_eq!(diag.inner.severity, Severity::Warning);
        assert_eq!(diag.inner.labels.len(), 2);
        assert_eq!(diag.inner.labels[0].style, LabelStyle::Primary);
        assert_eq!(diag.inner.labels[1].style, LabelStyle::Secondary);
    }

    #[test]
    fn test_decorate_error_codes() {
        let err = DecorateError::DuplicateKeyword {
            function: "dataclasses.field".to_string(),
            name: "default".to_string(),
            span: Span::new(0, 5, 1, 1),
        };
        let diag = Diagnostic::from_decorate_error(&err, 0);
        assert_eq!(diag.code(), Some(&ErrorCode("E4002")));
        assert_eq!(diag.inner.labels.len(), 1);

        let diag = Diagnostic::from_decorate_error(&DecorateError::UnknownClass { id: 3 }, 0);
        assert_eq!(diag.code(), Some(&ErrorCode("E4007")));
        assert!(diag.inner.labels.is_empty());
    }

    #[test]
    fn test_json_output() {
        let diag = Diagnostic::from_check_error(&mismatch(), 0);
        let files = create_files("point.py", "class A:\n    x: int = 'hello'\n");
        let json = diag.to_json(&files).unwrap();

        let parsed: JsonDiagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.code.as_deref(), Some("E4001"));
        assert_eq!(parsed.severity, "error");
        assert_eq!(parsed.labels.len(), 1);
        assert_eq!(parsed.labels[0].start_line, 2);
        assert_eq!(parsed.labels[0].style, "primary");
    }
}
