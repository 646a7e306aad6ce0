//! # JSON codec.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::Codec;
use crate::error::CodecError;

/// JSON payload codec backed by `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(CodecError::encode)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::decode)
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
        let codec = JsonCodec;
        let reading = Reading {
            sensor: "boiler-2".into(),
            value: 98.4,
        };

        let bytes = codec.encode(&reading).unwrap();
        let decoded: Reading = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, reading);
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let err = JsonCodec.decode::<Reading>(b"{not json").unwrap_err();
        assert_eq!(err.as_label(), "codec_decode_failed");
    }
}
