//! # Medium Errors

use thiserror::Error;

/// Result type for medium operations
pub type MediumResult<T> = Result<T, MediumError>;

/// Persistent medium errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediumError {
    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error on `{key}`: {message}")]
    Io { key: String, message: String },
}

impl MediumError {
    /// Wrap an I/O failure with the key it occurred on.
    pub fn io(key: impl Into<String>, err: &std::io::Error) -> Self {
        MediumError::Io {
            key: key.into(),
            message: err.to_string(),
        }
    }
}
