//! Room registry: allocates room codes and creates games.

use std::sync::Arc;

use chrono::Utc;
use histime_protocol::{Game, GameId, GameSettings, RoomCode};
use histime_session::Actor;
use histime_store::{GameStore, StoreError};

use crate::{engine, CodeGenerator, GameError};

/// Creates games under unique room codes and resolves codes back to games.
///
/// A code is unique among non-terminal games only; once a game completes
/// or is cancelled its code may be handed out again.
pub struct RoomRegistry<S: GameStore> {
    store: Arc<S>,
    codes: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl<S: GameStore> RoomRegistry<S> {
    pub fn new(store: Arc<S>, codes: Arc<dyn CodeGenerator>, max_attempts: usize) -> Self {
        Self {
            store,
            codes,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates a waiting game with `host` in seat 0.
    ///
    /// Draws candidate codes until the store accepts one. The store's
    /// insert is the uniqueness check, so two concurrent creations can
    /// never end up sharing a code.
    ///
    /// # Errors
    /// - [`GameError::RoomAllocation`] if every attempt collided
    /// - [`GameError::Store`] for any other store failure
    pub async fn create_room(
        &self,
        settings: GameSettings,
        host: &Actor,
        display_name: Option<&str>,
    ) -> Result<Game, GameError> {
        let now = Utc::now();
        let host = engine::new_player(host, display_name, now);

        for attempt in 1..=self.max_attempts {
            let code = self.codes.next_code();
            let game = Game::new(GameId::new(), code, settings.clone(), host.clone(), now);

            match self.store.insert(game).await {
                Ok(game) => {
                    tracing::info!(
                        game_id = %game.id,
                        room_code = %game.room_code,
                        host = %game.players[0].username,
                        max_players = game.max_players,
                        "room created"
                    );
                    return Ok(game);
                }
                Err(StoreError::CodeTaken(code)) => {
                    tracing::debug!(%code, attempt, "room code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(attempts = self.max_attempts, "room code space exhausted");
        Err(GameError::RoomAllocation {
            attempts: self.max_attempts,
        })
    }

    /// The open game holding `code`.
    ///
    /// # Errors
    /// [`GameError::RoomNotFound`] if no non-terminal game uses the code.
    pub async fn resolve(&self, code: &RoomCode) -> Result<Game, GameError> {
        Ok(self.store.load_by_code(code).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequenceCodes;
    use histime_protocol::{Difficulty, GameStatus};
    use histime_store::MemoryStore;

    fn settings() -> GameSettings {
        GameSettings {
            difficulty: Difficulty::Easy,
            categories: vec![],
            max_players: 4,
        }
    }

    fn codes(raw: &[&str]) -> Arc<dyn CodeGenerator> {
        let codes = raw.iter().map(|c| RoomCode::parse(c).unwrap()).collect();
        Arc::new(SequenceCodes::new(codes).unwrap())
    }

    #[tokio::test]
    async fn test_create_room_seats_host_and_indexes_code() {
        let store = Arc::new(MemoryStore::new());
        let registry = RoomRegistry::new(Arc::clone(&store), codes(&["ROOM01"]), 4);

        let game = registry
            .create_room(settings(), &Actor::guest("ann"), None)
            .await
            .unwrap();
        assert_eq!(game.status, GameStatus::Waiting);
        assert_eq!(game.players.len(), 1);
        assert_eq!(game.players[0].username, "ann");
        assert_eq!(game.room_code.as_str(), "ROOM01");

        let resolved = registry.resolve(&game.room_code).await.unwrap();
        assert_eq!(resolved.id, game.id);
    }

    #[tokio::test]
    async fn test_create_room_retries_past_collisions() {
        let store = Arc::new(MemoryStore::new());
        let registry = RoomRegistry::new(Arc::clone(&store), codes(&["AAAAAA", "AAAAAA", "BBBBBB"]), 4);

        let first = registry.create_room(settings(), &Actor::guest("ann"), None).await.unwrap();
        let second = registry.create_room(settings(), &Actor::guest("bob"), None).await.unwrap();
        assert_eq!(first.room_code.as_str(), "AAAAAA");
        assert_eq!(second.room_code.as_str(), "BBBBBB");
    }

    #[tokio::test]
    async fn test_create_room_gives_up_after_max_attempts() {
        let store = Arc::new(MemoryStore::new());
        let registry = RoomRegistry::new(Arc::clone(&store), codes(&["AAAAAA"]), 3);

        registry.create_room(settings(), &Actor::guest("ann"), None).await.unwrap();
        let result = registry.create_room(settings(), &Actor::guest("bob"), None).await;
        assert!(matches!(result, Err(GameError::RoomAllocation { attempts: 3 })));
        assert_eq!(store.game_count().await, 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_not_found() {
        let registry = RoomRegistry::new(Arc::new(MemoryStore::new()), codes(&["AAAAAA"]), 1);
        let result = registry.resolve(&RoomCode::parse("ZZZZZZ").unwrap()).await;
        assert!(matches!(result, Err(GameError::RoomNotFound(_))));
    }
}
