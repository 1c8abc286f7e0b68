//! Error types for harness setup.
//!
//! These cover failures that stop the harness before any case runs. Problems
//! observed while a case runs are reported through [`crate::CaseOutcome`]
//! instead, so that a misbehaving target never aborts the whole run.

use thiserror::Error;

/// Errors surfaced while preparing or reporting a harness run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HarnessError {
    /// Harness settings could not be loaded or were invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The blocking HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Error detail reported by the HTTP stack.
        message: String,
    },

    /// Writing the report failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl From<std::io::Error> for HarnessError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
