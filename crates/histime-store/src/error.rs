//! Error types for the store layer.

use histime_protocol::{GameId, RoomCode};

/// Errors that can occur while loading or saving games.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No game has this id.
    #[error("game {0} not found")]
    NotFound(GameId),

    /// No non-terminal game holds this room code.
    #[error("no open game with room code {0}")]
    CodeNotFound(RoomCode),

    /// A non-terminal game already holds this room code.
    #[error("room code {0} is in use")]
    CodeTaken(RoomCode),

    /// A game with this id was already inserted.
    #[error("game {0} already exists")]
    AlreadyExists(GameId),

    /// The game was saved by someone else since it was loaded.
    #[error("game {id} was modified concurrently (expected version {expected}, found {found})")]
    VersionConflict {
        id: GameId,
        expected: u64,
        found: u64,
    },

    /// The snapshot file could not be read or decoded.
    #[error("snapshot failed: {0}")]
    Snapshot(String),
}
