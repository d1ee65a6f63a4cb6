//! Core types of the game aggregate.
//!
//! Everything here is plain data: it is what the store persists and what
//! the state machine in `histime-room` transforms. The JSON field names are
//! camelCase because web and mobile clients consume them directly.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque, immutable identifier of a game, assigned at creation.
///
/// Serialized as a bare UUID string so it can appear in URLs unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub Uuid);

impl GameId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ProtocolError::InvalidGameId(s.to_string()))
    }
}

/// A six-character, human-shareable room code such as `ABC123`.
///
/// Codes are case-insensitive on input and always stored upper-case.
/// Construction goes through [`RoomCode::parse`] (or serde, which calls
/// it), so a `RoomCode` value is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Number of characters in every room code.
    pub const LEN: usize = 6;

    /// Characters generated codes are drawn from.
    pub const ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Builds a code from one [`Self::ALPHABET`] index per character.
    /// Indices wrap around the alphabet.
    pub fn from_indices(indices: [usize; Self::LEN]) -> Self {
        Self(
            indices
                .iter()
                .map(|&i| Self::ALPHABET[i % Self::ALPHABET.len()] as char)
                .collect(),
        )
    }

    /// Validates and normalizes a room code.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRoomCode`] unless the input is
    /// exactly [`Self::LEN`] ASCII letters or digits.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let trimmed = raw.trim();
        let valid = trimmed.len() == Self::LEN
            && trimmed.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(ProtocolError::InvalidRoomCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an authenticated account, issued by the external auth
/// provider. History Time never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a historical-event card, issued by the card catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// How obscure the drawn events are. Fixed at game creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ProtocolError::UnknownDifficulty(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a game.
///
/// ```text
/// Waiting ──start──→ Active ──last card / end / all left──→ Completed
///    │
///    └──sole player leaves──→ Cancelled
/// ```
///
/// `Completed` and `Cancelled` are terminal. Once a game is terminal its
/// room code may be handed to a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Active,
    Completed,
    Cancelled,
}

impl GameStatus {
    /// Returns `true` for `Completed` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` if the game still accepts joins.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if moving to `target` respects the lifecycle.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Waiting, Self::Active)
                | (Self::Waiting, Self::Cancelled)
                | (Self::Active, Self::Completed)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// A historical event as supplied by the card catalogue.
///
/// `year` is the chronological value used for correctness; negative
/// values are BCE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub year: i32,
    pub category: String,
    pub difficulty: Difficulty,
}

/// A card sitting in a player's hand.
///
/// `draw_order` is the position at which the card came out of the deck at
/// start. Hands are kept sorted by it, which gives every client the same
/// deterministic card order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandCard {
    #[serde(flatten)]
    pub card: Card,
    pub draw_order: u32,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One seat in a game. Owned by the [`Game`]; it has no identity of its
/// own outside it.
///
/// Players are never removed. Leaving flips `is_active` to `false` so seat
/// indices, which the turn pointer and timeline attribution rely on, stay
/// stable for the lifetime of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Set for authenticated players, absent for guests.
    pub user_id: Option<UserId>,
    /// Optional self-declared guest identifier.
    pub guest_id: Option<String>,
    pub username: String,
    /// Undrawn hand, sorted by `draw_order`.
    pub cards: Vec<HandCard>,
    pub is_active: bool,
    /// Number of correct placements.
    pub score: u32,
    /// Number of placements made, correct or not.
    pub placements: u32,
    pub joined_at: DateTime<Utc>,
}

impl Player {
    /// Creates an active player with an empty hand.
    pub fn new(
        user_id: Option<UserId>,
        guest_id: Option<String>,
        username: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            guest_id,
            username,
            cards: Vec::new(),
            is_active: true,
            score: 0,
            placements: 0,
            joined_at: now,
        }
    }

    /// Returns `true` if this seat belongs to a guest.
    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }

    /// Returns `true` if the player still has cards to place.
    pub fn has_cards(&self) -> bool {
        !self.cards.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// One card placed on the timeline. Append-only: never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub card_id: CardId,
    pub title: String,
    pub year: i32,
    /// Timeline slot the card was put in.
    pub position: u32,
    /// Seat index of the player who placed it.
    pub placed_by: usize,
    pub placement_time: DateTime<Utc>,
    pub is_correct: bool,
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// The configuration a game is created with. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub difficulty: Difficulty,
    /// Category filter for the deck; empty means "any category".
    pub categories: Vec<String>,
    pub max_players: usize,
}

impl GameSettings {
    /// Smallest allowed `max_players`, and the minimum roster to start.
    pub const MIN_PLAYERS: usize = 2;
    /// Largest allowed `max_players`.
    pub const MAX_PLAYERS: usize = 8;
}

/// The game aggregate root.
///
/// Loaded, transformed, and saved as one unit. `version` and the two
/// timestamps are owned by the store; everything else by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub room_code: RoomCode,
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub categories: Vec<String>,
    pub max_players: usize,
    /// Seat order is turn order.
    pub players: Vec<Player>,
    /// Placements in commit order.
    pub timeline: Vec<Placement>,
    /// Seat whose turn it is. Meaningful only while `Active`.
    pub current_player_index: usize,
    /// Number of timeline slots, fixed to the total cards dealt at start.
    pub timeline_capacity: u32,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Creates a `Waiting` game whose only player is `host`.
    pub fn new(
        id: GameId,
        room_code: RoomCode,
        settings: GameSettings,
        host: Player,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_code,
            status: GameStatus::Waiting,
            difficulty: settings.difficulty,
            categories: settings.categories,
            max_players: settings.max_players,
            players: vec![host],
            timeline: Vec::new(),
            current_player_index: 0,
            timeline_capacity: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seat index of the host: the first active player in seat order.
    pub fn host_index(&self) -> Option<usize> {
        self.players.iter().position(|p| p.is_active)
    }

    /// Number of players who have not left.
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active).count()
    }

    /// The player holding the turn, if the game is running.
    pub fn current_player(&self) -> Option<&Player> {
        if self.status != GameStatus::Active {
            return None;
        }
        self.players.get(self.current_player_index)
    }

    /// Returns `true` if some placement already uses `position`.
    pub fn is_position_occupied(&self, position: u32) -> bool {
        self.timeline.iter().any(|p| p.position == position)
    }
}

// =========================================================================
// Tests
// =========================================================================
