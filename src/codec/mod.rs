//! Payload codecs: typed value ↔ byte payload.
//!
//! The dispatch and batching core treats serialization as a black box behind
//! the [`Codec`] contract; protocol pipe stages and the file consumer take
//! any implementation. Two are provided:
//!
//! - [`JsonCodec`] — human-readable JSON via `serde_json`
//! - [`BinaryCodec`] — compact binary via `bitcode`

mod binary;
mod json;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

pub use binary::BinaryCodec;
pub use json::JsonCodec;

/// Encodes typed values to byte payloads and back.
pub trait Codec: Send + Sync {
    /// Encodes a value to its byte payload.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decodes a byte payload into a typed value.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}
