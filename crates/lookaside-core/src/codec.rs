//! Value serialization for the distributed tier.
//!
//! The cache tiers treat domain values as opaque beyond requiring an
//! encode/decode pair to a byte representation. The local tier holds the
//! decoded value; the distributed tier stores the encoded form.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors produced while encoding or decoding a cached value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be encoded.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The payload could not be decoded. A decode failure on a cached
    /// payload is treated as a miss for that tier, never as a lookup error.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A byte codec for domain values.
///
/// # Implementors
///
/// - [`JsonCodec`] - JSON via serde
/// - (Future) a binary codec for payloads where JSON overhead matters
pub trait ValueCodec<V>: Send + Sync {
    /// Encodes a value to its byte representation.
    fn encode(&self, value: &V) -> Result<Vec<u8>, CodecError>;

    /// Decodes a value from its byte representation.
    fn decode(&self, bytes: &[u8]) -> Result<V, CodecError>;
}

/// JSON codec over serde.
///
/// # Example
///
/// ```
/// use lookaside_core::{JsonCodec, ValueCodec};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Profile {
///     id: u64,
///     name: String,
/// }
///
/// let codec = JsonCodec;
/// let profile = Profile { id: 42, name: "Ana".to_string() };
///
/// let bytes = codec.encode(&profile).unwrap();
/// let back: Profile = codec.decode(&bytes).unwrap();
/// assert_eq!(profile, back);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<V> ValueCodec<V> for JsonCodec
where
    V: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &V) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(CodecError::Encode)
    }

    fn decode(&self, bytes: &[u8]) -> Result<V, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: u64,
        name: String,
        image: String,
    }

    #[test]
    fn test_json_roundtrip() {
        let codec = JsonCodec;
        let payload = Payload {
            id: 42,
            name: "Ana".to_string(),
            image: "avatars/ana.png".to_string(),
        };

        let bytes = codec.encode(&payload).unwrap();
        let back: Payload = codec.decode(&bytes).unwrap();

        assert_eq!(payload, back);
    }

    #[test]
    fn test_decode_corrupt_payload() {
        let codec = JsonCodec;
        let result: Result<Payload, _> = codec.decode(b"{not json");

        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_shape() {
        let codec = JsonCodec;
        let result: Result<Payload, _> = codec.decode(b"{\"id\": \"not-a-number\"}");

        assert!(result.is_err());
    }
}
