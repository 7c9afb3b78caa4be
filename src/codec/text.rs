//! # Text Codecs
//!
//! Plain-string and RFC 3339 date payloads, for keys that predate the JSON
//! layout and store bare text.

use chrono::{DateTime, SecondsFormat, Utc};

use super::errors::{CodecError, CodecResult};
use super::Codec;

/// UTF-8 string passthrough.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec<String> for TextCodec {
    fn decode(&self, bytes: &[u8]) -> CodecResult<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    fn encode(&self, value: &String) -> CodecResult<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }
}

/// RFC 3339 timestamp stored as bare text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateCodec;

impl Codec<DateTime<Utc>> for DateCodec {
    fn decode(&self, bytes: &[u8]) -> CodecResult<DateTime<Utc>> {
        let text = std::str::from_utf8(bytes).map_err(|e| CodecError::Malformed(e.to_string()))?;
        DateTime::parse_from_rfc3339(text.trim())
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| CodecError::Malformed(format!("invalid datetime `{text}`: {e}")))
    }

    fn encode(&self, value: &DateTime<Utc>) -> CodecResult<Vec<u8>> {
        Ok(value
            .to_rfc3339_opts(SecondsFormat::Secs, true)
            .into_bytes())
    }
}
