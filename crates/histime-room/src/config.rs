//! Game rules and settings validation.

use histime_protocol::{Difficulty, GameSettings};

use crate::GameError;

/// Server-wide tunables for every game.
#[derive(Debug, Clone)]
pub struct GameRules {
    /// Cards dealt to each player at start (fewer if the deck runs short).
    pub hand_size: usize,

    /// Room codes tried before creation gives up.
    pub max_code_attempts: usize,

    /// Whether a card whose year equals a neighbour's counts as correct.
    pub accept_equal_years: bool,

    /// `max_players` used when a create request doesn't specify one.
    pub default_max_players: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            hand_size: 5,
            max_code_attempts: 16,
            accept_equal_years: true,
            default_max_players: 4,
        }
    }
}

impl GameRules {
    /// Largest hand a player can be dealt.
    pub const MAX_HAND_SIZE: usize = 20;

    /// Clamps out-of-range values so the rules are safe to use.
    ///
    /// - `hand_size` to `1..=MAX_HAND_SIZE`
    /// - `max_code_attempts` to at least 1
    /// - `default_max_players` to the allowed player range
    pub fn validated(mut self) -> Self {
        let hand_size = self.hand_size.clamp(1, Self::MAX_HAND_SIZE);
        if hand_size != self.hand_size {
            tracing::warn!(requested = self.hand_size, hand_size, "hand_size out of range, clamping");
            self.hand_size = hand_size;
        }
        if self.max_code_attempts == 0 {
            tracing::warn!("max_code_attempts is 0, using 1");
            self.max_code_attempts = 1;
        }
        let max_players = self
            .default_max_players
            .clamp(GameSettings::MIN_PLAYERS, GameSettings::MAX_PLAYERS);
        if max_players != self.default_max_players {
            tracing::warn!(
                requested = self.default_max_players,
                max_players,
                "default_max_players out of range, clamping"
            );
            self.default_max_players = max_players;
        }
        self
    }

    /// Builds validated settings for a new game.
    ///
    /// Missing values fall back to the defaults. Categories are trimmed,
    /// lower-cased, and de-duplicated; blank ones are dropped.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidConfig`] if `max_players` is outside
    /// `2..=8`.
    pub fn settings(
        &self,
        max_players: Option<usize>,
        difficulty: Option<Difficulty>,
        categories: Option<Vec<String>>,
    ) -> Result<GameSettings, GameError> {
        let max_players = max_players.unwrap_or(self.default_max_players);
        if !(GameSettings::MIN_PLAYERS..=GameSettings::MAX_PLAYERS).contains(&max_players) {
            return Err(GameError::InvalidConfig(format!(
                "maxPlayers must be between {} and {}, got {max_players}",
                GameSettings::MIN_PLAYERS,
                GameSettings::MAX_PLAYERS
            )));
        }

        let mut normalized: Vec<String> = Vec::new();
        for category in categories.unwrap_or_default() {
            let category = category.trim().to_lowercase();
            if !category.is_empty() && !normalized.contains(&category) {
                normalized.push(category);
            }
        }

        Ok(GameSettings {
            difficulty: difficulty.unwrap_or_default(),
            categories: normalized,
            max_players,
        })
    }
}
