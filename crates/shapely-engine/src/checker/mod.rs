//! Error reporting for class decoration
//!
//! This module provides:
//! - Fatal decorator errors and non-fatal check errors
//! - Configurable warnings
//! - The error log that collects them during a run
//! - Codespan and JSON rendering

pub mod diagnostic;
pub mod error;
pub mod errorlog;

pub use diagnostic::{create_files, Diagnostic, ErrorCode, JsonDiagnostic, SimpleFiles};
pub use error::{CheckError, CheckWarning, DecorateError, WarningCode, WarningConfig};
pub use errorlog::ErrorLog;
