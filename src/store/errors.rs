//! # Store Errors

use thiserror::Error;

use crate::codec::CodecError;
use crate::medium::MediumError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A required read found nothing.
    #[error("no value stored under `{0}`")]
    MissingValue(String),

    /// Bytes are present but the codec rejected them.
    #[error("failed to decode `{key}`: {source}")]
    Decode { key: String, source: CodecError },

    /// The value could not be serialized. A programming defect.
    #[error("failed to encode value for `{key}`: {source}")]
    Encode { key: String, source: CodecError },

    /// The medium failed to read, write, remove, or rename.
    #[error("storage medium failed for `{key}`: {source}")]
    Medium { key: String, source: MediumError },
}

impl StoreError {
    pub fn missing(key: impl Into<String>) -> Self {
        StoreError::MissingValue(key.into())
    }

    pub fn decode(key: impl Into<String>, source: CodecError) -> Self {
        StoreError::Decode {
            key: key.into(),
            source,
        }
    }

    pub fn encode(key: impl Into<String>, source: CodecError) -> Self {
        StoreError::Encode {
            key: key.into(),
            source,
        }
    }

    pub fn medium(key: impl Into<String>, source: MediumError) -> Self {
        StoreError::Medium {
            key: key.into(),
            source,
        }
    }
}
