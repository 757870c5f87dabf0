//! Error types for spec loading, review, and rule execution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a spec document.
#[derive(Debug, Error)]
pub enum LintError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LintError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LintError::FileNotFound { .. } | LintError::ReadError { .. } => 3,
            LintError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors during a review pass.
///
/// The reviewer is designed to always produce a result; the single exception
/// is a document whose root is not a JSON object at all.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("malformed document: expected a JSON object at the root, got {actual}")]
    MalformedDocument { actual: String },
}

/// Error returned by a failing rule check.
///
/// A check that returns `Err` does not abort the review: the dispatcher
/// converts the error into a single error-severity finding tagged with the
/// offending rule id, and the rest of the catalog still runs.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule check failed: {message}")]
    CheckFailed { message: String },

    #[error("unexpected node shape at {location}: expected {expected}")]
    UnexpectedShape { location: String, expected: String },
}

impl RuleError {
    /// Shorthand for a free-form check failure.
    pub fn failed(message: impl Into<String>) -> Self {
        RuleError::CheckFailed {
            message: message.into(),
        }
    }
}
