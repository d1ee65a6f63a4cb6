//! Persistence for the game aggregate.
//!
//! The engine treats storage as a document database reached through the
//! [`GameStore`] trait: whole-aggregate `insert`, `load`, `load_by_code`,
//! and `save`, each atomic on its own and nothing more. Serializing
//! concurrent read-modify-write cycles on one game is the caller's job
//! (see `GameLocks` in `histime-room`); the store backs that up with an
//! optimistic version check.
//!
//! [`MemoryStore`] keeps games in a map, optionally mirrored to a JSON
//! snapshot file so a restart doesn't lose running games.

#![allow(async_fn_in_trait)]

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use histime_protocol::{Game, GameId, RoomCode};

/// Whole-aggregate persistence of games.
///
/// Room codes are indexed only while their game is non-terminal, so a code
/// becomes free again the moment its game is saved as completed or
/// cancelled.
pub trait GameStore: Send + Sync + 'static {
    /// Stores a new game.
    ///
    /// Sets `version` to 1 and both timestamps to now.
    ///
    /// # Errors
    /// - [`StoreError::AlreadyExists`]: the id is taken
    /// - [`StoreError::CodeTaken`]: a non-terminal game holds the code
    fn insert(&self, game: Game) -> impl Future<Output = Result<Game, StoreError>> + Send;

    /// Loads a game by id, terminal or not.
    fn load(&self, id: GameId) -> impl Future<Output = Result<Game, StoreError>> + Send;

    /// Loads the non-terminal game currently holding `code`.
    fn load_by_code(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<Game, StoreError>> + Send;

    /// Replaces a stored game.
    ///
    /// `game.version` must equal the stored version; on success the stored
    /// and returned copies carry `version + 1` and a fresh `updated_at`.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`]: no such game
    /// - [`StoreError::VersionConflict`]: someone saved in between
    fn save(&self, game: Game) -> impl Future<Output = Result<Game, StoreError>> + Send;
}
