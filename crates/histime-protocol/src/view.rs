//! Client-facing projection of a game.
//!
//! The stored [`Game`] knows the year of every card in every hand. Sending
//! that to clients would give the answers away, so the HTTP layer returns a
//! [`GameView`] instead: identical to the aggregate except that hand cards
//! drop their `year`. Placed cards keep theirs, since the timeline is
//! public once a card is down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    CardId, Difficulty, Game, GameId, GameStatus, HandCard, Placement, Player,
    RoomCode, UserId,
};

/// A hand card without its year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandCardView {
    pub id: CardId,
    pub title: String,
    pub category: String,
    pub draw_order: u32,
}

impl From<&HandCard> for HandCardView {
    fn from(hand: &HandCard) -> Self {
        Self {
            id: hand.card.id.clone(),
            title: hand.card.title.clone(),
            category: hand.card.category.clone(),
            draw_order: hand.draw_order,
        }
    }
}

/// A seat as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub user_id: Option<UserId>,
    pub guest_id: Option<String>,
    pub username: String,
    pub cards: Vec<HandCardView>,
    pub is_active: bool,
    pub is_host: bool,
    pub score: u32,
    pub placements: u32,
}

/// One row of the final ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub seat: usize,
    pub username: String,
    pub score: u32,
    pub placements: u32,
    pub is_active: bool,
}

/// The game as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: GameId,
    pub room_code: RoomCode,
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub categories: Vec<String>,
    pub max_players: usize,
    pub players: Vec<PlayerView>,
    pub timeline: Vec<Placement>,
    /// `None` unless the game is active.
    pub current_player_index: Option<usize>,
    pub timeline_capacity: u32,
    /// Filled in once the game is terminal.
    pub standings: Option<Vec<Standing>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Ranks every seat by score (descending), then seat order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut rows: Vec<Standing> = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| Standing {
                seat,
                username: p.username.clone(),
                score: p.score,
                placements: p.placements,
                is_active: p.is_active,
            })
            .collect();
        // `sort_by` is stable, so equal scores keep seat order.
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows
    }
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        let host = game.host_index();
        let players = game
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| player_view(p, host == Some(seat)))
            .collect();

        Self {
            id: game.id,
            room_code: game.room_code.clone(),
            status: game.status,
            difficulty: game.difficulty,
            categories: game.categories.clone(),
            max_players: game.max_players,
            players,
            timeline: game.timeline.clone(),
            current_player_index: (game.status == GameStatus::Active)
                .then_some(game.current_player_index),
            timeline_capacity: game.timeline_capacity,
            standings: game.status.is_terminal().then(|| game.standings()),
            created_at: game.created_at,
            updated_at: game.updated_at,
        }
    }
}

fn player_view(player: &Player, is_host: bool) -> PlayerView {
    PlayerView {
        user_id: player.user_id.clone(),
        guest_id: player.guest_id.clone(),
        username: player.username.clone(),
        cards: player.cards.iter().map(HandCardView::from).collect(),
        is_active: player.is_active,
        is_host,
        score: player.score,
        placements: player.placements,
    }
}
