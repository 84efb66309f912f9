//! Error types for the numeric routines.

use thiserror::Error;

/// Result type alias for routine execution.
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Errors raised by the numeric routines and by payload decoding.
///
/// Every variant is the caller's fault: correcting the input makes the
/// call succeed. Storage and lifecycle failures live in their own types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    /// Malformed or out-of-range arguments.
    #[error("{0}")]
    InvalidInput(String),
}

impl AlgorithmError {
    /// Build an [`AlgorithmError::InvalidInput`] from any message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<serde_json::Error> for AlgorithmError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("Invalid input data: {err}"))
    }
}
