//! JSON bodies of the HTTP boundary.
//!
//! Guest identity can arrive in headers or in the body. The body variant is
//! [`GuestFields`], flattened into every request that accepts an actor.

use serde::{Deserialize, Serialize};

use crate::{CardId, Difficulty, GameView};

/// Guest-identifying fields accepted in request bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestFields {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub guest_id: Option<String>,
}

/// `POST /games`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default)]
    pub max_players: Option<usize>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(flatten)]
    pub guest: GuestFields,
}

/// `POST /games/{id}/place-card`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCardRequest {
    pub card_id: CardId,
    pub position: u32,
    #[serde(flatten)]
    pub guest: GuestFields,
}

/// Outcome of a single placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    pub is_correct: bool,
    pub card_id: CardId,
    pub position: u32,
}

/// Response of every endpoint that returns a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResponse {
    pub game: GameView,
}

/// Response of `place-card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCardResponse {
    pub game: GameView,
    pub result: PlacementResult,
}

/// Body of every error response.
///
/// `error` is a stable machine-readable code (e.g. `not_your_turn`);
/// `message` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_game_request_accepts_empty_body() {
        let req: CreateGameRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, CreateGameRequest::default());
    }

    #[test]
    fn test_place_card_request_reads_flattened_guest_fields() {
        let req: PlaceCardRequest = serde_json::from_str(
            r#"{"cardId":"moon","position":2,"username":"ann","guestId":"g-1"}"#,
        )
        .unwrap();
        assert_eq!(req.card_id, CardId("moon".into()));
        assert_eq!(req.position, 2);
        assert_eq!(req.guest.username.as_deref(), Some("ann"));
        assert_eq!(req.guest.guest_id.as_deref(), Some("g-1"));
    }

    #[test]
    fn test_placement_result_json_shape() {
        let result = PlacementResult {
            is_correct: true,
            card_id: CardId("moon".into()),
            position: 0,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isCorrect"], true);
        assert_eq!(json["cardId"], "moon");
    }
}
