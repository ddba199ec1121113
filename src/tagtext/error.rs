//! Error types shared across the engine
//!
//! Only lexing, grammar construction and locator compilation report errors to the
//! caller. Parse failures inside a grammar are plain `None`s, and problems found
//! while building nodes are recorded on the node as diagnostics (see
//! [`Diagnostic`](crate::tagtext::ast::Diagnostic)) instead of aborting the build.

use thiserror::Error;

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// No rule, not even the word fallback, can consume the input at `offset`
    #[error("no lexer rule matches at byte {offset}: {snippet:?}")]
    NoMatch { offset: usize, snippet: String },
}

impl LexError {
    pub(crate) fn no_match(source: &str, offset: usize) -> Self {
        let snippet = source[offset..].chars().take(16).collect();
        LexError::NoMatch { offset, snippet }
    }
}

/// Errors reported while assembling a grammar from named rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),
    #[error("rule `{rule}` refers to undefined rule `{missing}`")]
    UnknownRule { rule: String, missing: String },
    #[error("start rule `{0}` is not defined")]
    MissingStart(String),
}

/// Errors reported while compiling a locator path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("invalid locator path: {0:?}")]
    Syntax(String),
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("invalid pattern {pattern:?} in locator: {message}")]
    Pattern { pattern: String, message: String },
    #[error("positional index must be 1 or greater in {0:?}")]
    ZeroIndex(String),
}

/// A problem detected by a tag handler while building a node
///
/// Build errors never propagate past the node that produced them; the lifecycle
/// turns them into diagnostics and keeps building siblings and ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BuildError {
    pub code: String,
    pub message: String,
}

impl BuildError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: "build-failed".to_string(),
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}
