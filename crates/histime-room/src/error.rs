//! Error types for the game layer.

use histime_cards::CardError;
use histime_protocol::{CardId, GameId, GameStatus, RoomCode};
use histime_store::StoreError;

/// Errors that can occur during game operations.
///
/// Every precondition failure leaves the game untouched: operations check
/// everything before they change anything.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// No game has this id.
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// No open game holds this room code.
    #[error("no open game with room code {0}")]
    RoomNotFound(RoomCode),

    /// The operation isn't valid in the game's current status.
    #[error("cannot {operation} a game that is {status}")]
    InvalidState {
        operation: &'static str,
        status: GameStatus,
    },

    /// Every seat is taken.
    #[error("game is full ({max_players} players)")]
    GameFull { max_players: usize },

    /// The actor already holds an active seat.
    #[error("{0} is already in this game")]
    DuplicatePlayer(String),

    /// Too few active players to start.
    #[error("need at least {required} players to start, have {active}")]
    InsufficientPlayers { active: usize, required: usize },

    /// Only the host may do this.
    #[error("only the host can do this")]
    NotHost,

    /// Someone else holds the turn.
    #[error("it is not your turn")]
    NotYourTurn,

    /// The card isn't in the acting player's hand.
    #[error("card {0} is not in your hand")]
    CardNotInHand(CardId),

    /// A card already sits in this timeline slot.
    #[error("timeline position {0} is already taken")]
    PositionOccupied(u32),

    /// The slot is outside the timeline.
    #[error("timeline position {position} is out of range (0..{capacity})")]
    InvalidPosition { position: u32, capacity: u32 },

    /// The actor has no active seat in this game.
    #[error("player not found in this game")]
    PlayerNotFound,

    /// No free room code was found within the attempt budget.
    #[error("could not allocate a room code after {attempts} attempts")]
    RoomAllocation { attempts: usize },

    /// The requested game settings are out of range.
    #[error("invalid game settings: {0}")]
    InvalidConfig(String),

    /// The store failed for a reason other than a missing game.
    #[error(transparent)]
    Store(StoreError),

    /// The card service failed.
    #[error(transparent)]
    Cards(#[from] CardError),
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::GameNotFound(id),
            StoreError::CodeNotFound(code) => Self::RoomNotFound(code),
            other => Self::Store(other),
        }
    }
}

impl GameError {
    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::GameNotFound(_) | Self::RoomNotFound(_) => "not_found",
            Self::InvalidState { .. } => "invalid_state",
            Self::GameFull { .. } => "game_full",
            Self::DuplicatePlayer(_) => "duplicate_player",
            Self::InsufficientPlayers { .. } => "insufficient_players",
            Self::NotHost => "not_host",
            Self::NotYourTurn => "not_your_turn",
            Self::CardNotInHand(_) => "card_not_in_hand",
            Self::PositionOccupied(_) => "position_occupied",
            Self::InvalidPosition { .. } => "invalid_position",
            Self::PlayerNotFound => "player_not_found",
            Self::RoomAllocation { .. } => "room_allocation",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Store(StoreError::VersionConflict { .. }) => "conflict",
            Self::Store(_) => "store",
            Self::Cards(_) => "card_service",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_store_not_found_maps_to_game_not_found() {
        let id = GameId::new();
        let err: GameError = StoreError::NotFound(id).into();
        assert!(matches!(err, GameError::GameNotFound(g) if g == id));
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_from_store_code_not_found_maps_to_room_not_found() {
        let code = RoomCode::parse("ABC123").unwrap();
        let err: GameError = StoreError::CodeNotFound(code).into();
        assert!(matches!(err, GameError::RoomNotFound(_)));
    }

    #[test]
    fn test_from_store_other_errors_wrap() {
        let err: GameError = StoreError::Snapshot("disk full".into()).into();
        assert!(matches!(err, GameError::Store(_)));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_invalid_state_message_names_operation_and_status() {
        let err = GameError::InvalidState {
            operation: "join",
            status: GameStatus::Active,
        };
        assert_eq!(err.to_string(), "cannot join a game that is active");
    }
}
