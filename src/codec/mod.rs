//! Codec subsystem for celldb
//!
//! A codec is the only component allowed to turn typed values into persisted
//! bytes and back. Codecs are pure: `decode(encode(v)) == v` for every
//! representable `v`, and neither direction touches the medium.

mod errors;
mod json;
mod text;

pub use errors::{CodecError, CodecResult};
pub use json::JsonCodec;
pub use text::{DateCodec, TextCodec};

/// Bidirectional transform between a typed value and a persisted payload.
pub trait Codec<T>: Send + Sync {
    /// Decode a persisted payload. Fails on malformed or incompatible bytes.
    fn decode(&self, bytes: &[u8]) -> CodecResult<T>;

    /// Encode a value for persistence. Fails only on a defect.
    fn encode(&self, value: &T) -> CodecResult<Vec<u8>>;
}
