//! Codec trait and implementations for turning values into bytes.
//!
//! The HTTP layer lets axum handle JSON bodies directly; the codec exists
//! for the places where the crate itself writes bytes, chiefly the store's
//! snapshot file. Keeping it behind a trait means a compact binary format
//! can replace JSON there without touching the store.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` lets a codec live inside long-running tasks and
/// be shared across Tokio worker threads.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Output is pretty-printed: snapshot files are meant to be readable by a
/// human poking at a stuck game.
///
/// ```rust
/// use histime_protocol::{Codec, Difficulty, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&Difficulty::Hard).unwrap();
/// let back: Difficulty = codec.decode(&bytes).unwrap();
/// assert_eq!(back, Difficulty::Hard);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec_pretty(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::RoomCode;

    #[test]
    fn test_json_codec_decode_malformed_returns_decode_error() {
        let result: Result<RoomCode, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_rejects_invalid_room_code() {
        // RoomCode validates on deserialize, so a bad code never enters
        // the model through a snapshot.
        let result: Result<RoomCode, _> = JsonCodec.decode(b"\"ab\"");
        assert!(result.is_err());
    }
}
