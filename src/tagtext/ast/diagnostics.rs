//! Per-node diagnostics
//!
//! Problems found while building a tree never abort the build. They are recorded
//! on the node where they happened and can be collected afterwards with
//! [`Tree::diagnostics`](crate::tagtext::building::Tree::diagnostics).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tagtext::error::BuildError;

/// Code recorded when a header line cannot be decoded
pub const HEADER_PARSE_FAILED: &str = "header-parse-failed";
/// Code recorded when a body grammar rejects a node's body
pub const BODY_PARSE_FAILED: &str = "body-parse-failed";
/// Code recorded when a `:parser` marker names no registered body grammar
pub const UNKNOWN_PARSER: &str = "unknown-parser";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// A free-text annotation attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl From<BuildError> for Diagnostic {
    fn from(err: BuildError) -> Self {
        Diagnostic::error(err.message).with_code(err.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}
