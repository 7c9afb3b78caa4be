//! # Codec Errors

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Codec errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Bytes are present but malformed or schema-incompatible.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The value cannot be serialized. A defect for well-typed data.
    #[error("unencodable value: {0}")]
    Unencodable(String),
}
