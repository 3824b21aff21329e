//! Errors returned by graph builds.

use thiserror::Error;

/// Errors a build can fail with.
///
/// Malformed but parseable business data is never an error: nodes and edges
/// that depend on missing or ill-typed fields are simply absent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The input text is not syntactically valid JSON.
    #[error("Invalid JSON: {0}")]
    Parse(String),

    /// Build options or a classification rule table could not be read.
    #[error("invalid build options: {0}")]
    Options(String),

    /// Anything else. Indicates a defect rather than bad input.
    #[error("unexpected error while building graph: {0}")]
    Unknown(String),
}

impl GraphError {
    /// Short machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::Parse(_) => "parse_error",
            GraphError::Options(_) => "options_error",
            GraphError::Unknown(_) => "unknown_error",
        }
    }
}
