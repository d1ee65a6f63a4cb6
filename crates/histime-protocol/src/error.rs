//! Error types for the protocol layer.
//!
//! Each History Time crate defines its own error enum. A `ProtocolError`
//! always means "this value could not be encoded, decoded, or parsed",
//! never a rule violation inside a game.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed JSON, missing fields, wrong types).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room code was not exactly six ASCII letters or digits.
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),

    /// A game id was not a valid UUID.
    #[error("invalid game id: {0:?}")]
    InvalidGameId(String),

    /// A difficulty name was not one of `easy`, `medium`, `hard`.
    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}
