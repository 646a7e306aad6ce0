//! # Compact binary codec.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::Codec;
use crate::error::CodecError;

/// Binary payload codec backed by `bitcode`.
///
/// Payloads are compact and not self-describing; both ends must agree on the
/// type.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bitcode::serialize(value).map_err(CodecError::encode)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bitcode::deserialize(bytes).map_err(CodecError::decode)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Reading {
        sensor: String,
        value: f64,
    }

    #[test]
    fn round_trips_a_value() {
        let codec = BinaryCodec;
        let reading = Reading {
            sensor: "boiler-2".into(),
            value: 98.4,
        };

        let bytes = codec.encode(&reading).unwrap();
        let decoded: Reading = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, reading);
    }

    #[test]
    fn truncated_payload_is_a_decode_error() {
        let err = BinaryCodec.decode::<Reading>(&[0x01]).unwrap_err();
        assert_eq!(err.as_label(), "codec_decode_failed");
    }
}
