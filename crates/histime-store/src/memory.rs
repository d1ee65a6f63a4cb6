//! In-memory game store with an optional JSON snapshot file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use histime_protocol::{Codec, Game, GameId, JsonCodec, RoomCode};
use tokio::sync::RwLock;

use crate::{GameStore, StoreError};

#[derive(Default)]
struct Inner {
    games: HashMap<GameId, Game>,
    /// Room code → id, for non-terminal games only.
    active_codes: HashMap<RoomCode, GameId>,
}

impl Inner {
    fn from_games(games: Vec<Game>) -> Self {
        let mut inner = Self::default();
        for game in games {
            if !game.status.is_terminal() {
                inner.active_codes.insert(game.room_code.clone(), game.id);
            }
            inner.games.insert(game.id, game);
        }
        inner
    }

    /// Binds or releases the game's code according to its status.
    fn reindex(&mut self, game: &Game) {
        if game.status.is_terminal() {
            if self.active_codes.get(&game.room_code) == Some(&game.id) {
                self.active_codes.remove(&game.room_code);
            }
        } else {
            self.active_codes.insert(game.room_code.clone(), game.id);
        }
    }
}

/// A [`GameStore`] that keeps every game in memory.
///
/// With a snapshot path, the full game map is rewritten to that file on
/// every insert and save, and read back by [`MemoryStore::with_snapshot`].
/// The file is written before the change lands in memory; if the write
/// fails the operation fails with [`StoreError::Snapshot`] and the store is
/// unchanged.
pub struct MemoryStore<C: Codec = JsonCodec> {
    inner: RwLock<Inner>,
    snapshot: Option<PathBuf>,
    codec: C,
}

impl MemoryStore {
    /// Creates an empty store without a snapshot file.
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }

    /// Creates a store mirrored to a JSON snapshot at `path`, restoring any
    /// games already in the file.
    ///
    /// # Errors
    /// Returns [`StoreError::Snapshot`] if the file exists but can't be
    /// read or decoded. A missing file starts an empty store.
    pub async fn with_snapshot(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::with_snapshot_and_codec(path, JsonCodec).await
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> MemoryStore<C> {
    /// Creates an empty store that would encode snapshots with `codec`.
    pub fn with_codec(codec: C) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            snapshot: None,
            codec,
        }
    }

    /// Like [`MemoryStore::with_snapshot`] with a custom codec.
    pub async fn with_snapshot_and_codec(
        path: impl Into<PathBuf>,
        codec: C,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let games: Vec<Game> = match tokio::fs::read(&path).await {
            Ok(bytes) => codec
                .decode(&bytes)
                .map_err(|e| StoreError::Snapshot(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Snapshot(format!("{}: {e}", path.display())));
            }
        };

        tracing::info!(path = %path.display(), games = games.len(), "game store restored");

        Ok(Self {
            inner: RwLock::new(Inner::from_games(games)),
            snapshot: Some(path),
            codec,
        })
    }

    /// Number of stored games, terminal ones included.
    pub async fn game_count(&self) -> usize {
        self.inner.read().await.games.len()
    }

    /// Rewrites the snapshot file as it will read once `pending` is
    /// committed. Called with the write lock held so snapshots land in
    /// commit order.
    async fn write_snapshot(&self, inner: &Inner, pending: &Game) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let mut games: Vec<&Game> = inner
            .games
            .values()
            .filter(|g| g.id != pending.id)
            .chain(std::iter::once(pending))
            .collect();
        games.sort_by_key(|g| g.created_at);

        let bytes = self.codec.encode(&games).map_err(|e| {
            tracing::error!(game_id = %pending.id, error = %e, "snapshot encode failed");
            StoreError::Snapshot(e.to_string())
        })?;
        write_atomically(path, &bytes).await.map_err(|e| {
            tracing::error!(game_id = %pending.id, path = %path.display(), error = %e, "snapshot write failed");
            StoreError::Snapshot(format!("{}: {e}", path.display()))
        })
    }
}

/// Writes to a sibling temp file and renames it over the target, so a
/// crash mid-write never leaves a truncated snapshot.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}

impl<C: Codec> GameStore for MemoryStore<C> {
    async fn insert(&self, mut game: Game) -> Result<Game, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.games.contains_key(&game.id) {
            return Err(StoreError::AlreadyExists(game.id));
        }
        if !game.status.is_terminal() && inner.active_codes.contains_key(&game.room_code) {
            return Err(StoreError::CodeTaken(game.room_code));
        }

        let now = Utc::now();
        game.version = 1;
        game.created_at = now;
        game.updated_at = now;

        self.write_snapshot(&inner, &game).await?;
        inner.reindex(&game);
        inner.games.insert(game.id, game.clone());

        Ok(game)
    }

    async fn load(&self, id: GameId) -> Result<Game, StoreError> {
        self.inner
            .read()
            .await
            .games
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn load_by_code(&self, code: &RoomCode) -> Result<Game, StoreError> {
        let inner = self.inner.read().await;
        inner
            .active_codes
            .get(code)
            .and_then(|id| inner.games.get(id))
            .cloned()
            .ok_or_else(|| StoreError::CodeNotFound(code.clone()))
    }

    async fn save(&self, mut game: Game) -> Result<Game, StoreError> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .games
            .get(&game.id)
            .ok_or(StoreError::NotFound(game.id))?;
        if stored.version != game.version {
            return Err(StoreError::VersionConflict {
                id: game.id,
                expected: game.version,
                found: stored.version,
            });
        }

        game.version += 1;
        game.created_at = stored.created_at;
        game.updated_at = Utc::now();

        self.write_snapshot(&inner, &game).await?;
        inner.reindex(&game);
        inner.games.insert(game.id, game.clone());

        Ok(game)
    }
}
