//! The game service: lock → load → apply → save.

use std::sync::Arc;

use chrono::Utc;
use histime_cards::CardSource;
use histime_protocol::{CardId, Game, GameId, GameSettings, PlacementResult, RoomCode};
use histime_session::Actor;
use histime_store::GameStore;

use crate::{engine, CodeGenerator, GameError, GameLocks, GameRules, RandomCodes, RoomRegistry};

/// Entry point for every game operation.
///
/// Each mutating call takes the game's lock, loads a fresh copy from the
/// store, runs the state machine on it, and saves the result. The save is
/// the single commit point: if any step fails, nothing is written and the
/// stored game is exactly as it was.
///
/// Reads (`get`, `get_by_code`) skip the lock and see the last committed
/// version.
pub struct GameService<S: GameStore, D: CardSource> {
    store: Arc<S>,
    cards: D,
    registry: RoomRegistry<S>,
    locks: GameLocks,
    rules: GameRules,
}

impl<S: GameStore, D: CardSource> GameService<S, D> {
    /// Creates a service that hands out random room codes.
    pub fn new(store: S, cards: D, rules: GameRules) -> Self {
        Self::with_codes(store, cards, rules, Arc::new(RandomCodes))
    }

    /// Creates a service with a custom room code generator.
    pub fn with_codes(store: S, cards: D, rules: GameRules, codes: Arc<dyn CodeGenerator>) -> Self {
        let rules = rules.validated();
        let store = Arc::new(store);
        Self {
            registry: RoomRegistry::new(Arc::clone(&store), codes, rules.max_code_attempts),
            store,
            cards,
            locks: GameLocks::new(),
            rules,
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// # Errors
    /// [`GameError::GameNotFound`] for an unknown id.
    pub async fn get(&self, id: GameId) -> Result<Game, GameError> {
        Ok(self.store.load(id).await?)
    }

    /// # Errors
    /// [`GameError::RoomNotFound`] unless an open game holds the code.
    pub async fn get_by_code(&self, code: &RoomCode) -> Result<Game, GameError> {
        self.registry.resolve(code).await
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Creates a waiting game hosted by `host`.
    pub async fn create_room(
        &self,
        settings: GameSettings,
        host: &Actor,
        display_name: Option<&str>,
    ) -> Result<Game, GameError> {
        self.registry.create_room(settings, host, display_name).await
    }

    /// Joins the open game holding `code`.
    pub async fn join_by_code(
        &self,
        code: &RoomCode,
        actor: &Actor,
        display_name: Option<&str>,
    ) -> Result<Game, GameError> {
        let game = self.registry.resolve(code).await?;
        self.join(game.id, actor, display_name).await
    }

    /// Joins a game by id.
    pub async fn join(
        &self,
        id: GameId,
        actor: &Actor,
        display_name: Option<&str>,
    ) -> Result<Game, GameError> {
        let (game, seat) = self
            .update(id, actor, "join", |game| {
                engine::join(game, actor, display_name, Utc::now())
            })
            .await?;
        tracing::info!(
            game_id = %id,
            %actor,
            seat,
            players = game.active_count(),
            "player joined"
        );
        Ok(game)
    }

    /// Deals cards and starts the game. Host only.
    pub async fn start(&self, id: GameId, actor: &Actor) -> Result<Game, GameError> {
        let guard = self.locks.acquire(id).await;
        let result = self.start_locked(id, actor).await;
        drop(guard);
        self.locks.release(id).await;

        match &result {
            Ok(game) => tracing::info!(
                game_id = %id,
                players = game.active_count(),
                cards = game.timeline_capacity,
                "game started"
            ),
            Err(e) => tracing::debug!(game_id = %id, %actor, op = "start", error = %e, "operation rejected"),
        }
        result
    }

    async fn start_locked(&self, id: GameId, actor: &Actor) -> Result<Game, GameError> {
        let mut game = self.store.load(id).await?;
        // Reject before calling out to the card service.
        engine::ensure_can_start(&game, actor)?;

        let wanted = self.rules.hand_size * game.active_count();
        let cards = self
            .cards
            .draw_hand(game.difficulty, &game.categories, wanted)
            .await?;

        engine::start(&mut game, actor, cards, self.rules.hand_size)?;
        Ok(self.store.save(game).await?)
    }

    /// Places a card for the player holding the turn.
    pub async fn place_card(
        &self,
        id: GameId,
        actor: &Actor,
        card_id: &CardId,
        position: u32,
    ) -> Result<(Game, PlacementResult), GameError> {
        let accept_equal_years = self.rules.accept_equal_years;
        let (game, result) = self
            .update(id, actor, "place_card", |game| {
                engine::place_card(game, actor, card_id, position, accept_equal_years, Utc::now())
            })
            .await?;

        tracing::info!(
            game_id = %id,
            %actor,
            card_id = %result.card_id,
            position,
            correct = result.is_correct,
            "card placed"
        );
        if game.status.is_terminal() {
            tracing::info!(game_id = %id, placements = game.timeline.len(), "game completed");
        }
        Ok((game, result))
    }

    /// Takes the actor out of the game.
    pub async fn leave(&self, id: GameId, actor: &Actor) -> Result<Game, GameError> {
        let (game, departure) = self
            .update(id, actor, "leave", |game| engine::leave(game, actor))
            .await?;

        tracing::info!(
            game_id = %id,
            %actor,
            seat = departure.seat,
            status = %game.status,
            "player left"
        );
        if let Some(host) = departure.new_host {
            tracing::info!(game_id = %id, seat = host, "host transferred");
        }
        Ok(game)
    }

    /// Ends a running game early. Host only.
    pub async fn end(&self, id: GameId, actor: &Actor) -> Result<Game, GameError> {
        let (game, ()) = self
            .update(id, actor, "end", |game| engine::end(game, actor))
            .await?;
        tracing::info!(game_id = %id, %actor, "game ended by host");
        Ok(game)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Runs `apply` on a freshly loaded game under its lock and saves it.
    async fn update<T: Send>(
        &self,
        id: GameId,
        actor: &Actor,
        op: &'static str,
        apply: impl FnOnce(&mut Game) -> Result<T, GameError> + Send,
    ) -> Result<(Game, T), GameError> {
        let guard = self.locks.acquire(id).await;
        let result = self.update_locked(id, apply).await;
        drop(guard);
        // Kept only while someone else holds or waits on it.
        self.locks.release(id).await;

        if let Err(e) = &result {
            tracing::debug!(game_id = %id, %actor, op, error = %e, "operation rejected");
        }
        result
    }

    async fn update_locked<T>(
        &self,
        id: GameId,
        apply: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<(Game, T), GameError> {
        let mut game = self.store.load(id).await?;
        let out = apply(&mut game)?;
        let game = self.store.save(game).await?;
        Ok((game, out))
    }
}
