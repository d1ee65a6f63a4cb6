//! The game state machine.
//!
//! Every function here takes the game by `&mut` and follows the same rule:
//! check every precondition first, mutate second. An `Err` return means the
//! game was not touched, so callers can work on the stored value directly
//! or on a clone without worrying about half-applied operations.
//!
//! ```text
//!  create ──► Waiting ──start──► Active ──last card / end──► Completed
//!               │                  │
//!               │ last player      │ last player leaves
//!               │ leaves           ▼
//!               └──────────► Cancelled      (Active ──► Completed)
//! ```
//!
//! Turn order is seat order. Only active players holding cards get a
//! turn; the game completes as soon as nobody active has a card left.
//! The host is whoever is first in seat order among active players, so
//! host transfer on leave needs no bookkeeping.
//!
//! Nothing here does I/O or reads the clock. Time comes in as `now`.

use chrono::{DateTime, Utc};
use histime_protocol::{
    Card, CardId, Game, GameSettings, GameStatus, HandCard, Placement, PlacementResult, Player,
};
use histime_cards::CardError;
use histime_session::Actor;

use crate::GameError;

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// Returns `true` if `player` is the seat of `actor`.
///
/// Authenticated actors match on `user_id`. Guests match guest seats by
/// username (case-insensitive); when both the seat and the actor carry a
/// guest id, those must agree too.
pub fn is_seat_of(player: &Player, actor: &Actor) -> bool {
    match actor {
        Actor::Authenticated { user_id, .. } => player.user_id.as_ref() == Some(user_id),
        Actor::Guest { username, guest_id } => {
            if !player.is_guest() || !same_name(&player.username, username) {
                return false;
            }
            match (&player.guest_id, guest_id) {
                (Some(seat_id), Some(actor_id)) => seat_id == actor_id,
                _ => true,
            }
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Returns `true` if `actor` already occupies an active seat for the
/// purpose of joining.
///
/// Guests are one seat per username: a different guest id doesn't make a
/// second `ann` a different player.
fn is_seated(game: &Game, actor: &Actor) -> bool {
    match actor {
        Actor::Authenticated { .. } => seat_of(game, actor).is_some(),
        Actor::Guest { username, .. } => game
            .players
            .iter()
            .any(|p| p.is_active && p.is_guest() && same_name(&p.username, username)),
    }
}

/// Seat index of the actor's active seat, if any.
pub fn seat_of(game: &Game, actor: &Actor) -> Option<usize> {
    game.players
        .iter()
        .position(|p| p.is_active && is_seat_of(p, actor))
}

/// Builds a fresh seat for `actor`.
///
/// Guests are known by their username, so `display_name` only applies to
/// authenticated actors, and only when non-blank.
pub fn new_player(actor: &Actor, display_name: Option<&str>, now: DateTime<Utc>) -> Player {
    match actor {
        Actor::Authenticated { user_id, username } => {
            let name = display_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(username.as_str());
            Player::new(Some(user_id.clone()), None, name.to_string(), now)
        }
        Actor::Guest { username, guest_id } => {
            Player::new(None, guest_id.clone(), username.clone(), now)
        }
    }
}

/// Next seat to play after `from`: the first active player with cards,
/// scanning forward and wrapping, with `from` itself considered last.
fn next_turn(game: &Game, from: usize) -> Option<usize> {
    let n = game.players.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&i| game.players[i].is_active && game.players[i].has_cards())
}

/// Moves the game to `target`. Callers have already checked the current
/// status.
fn transition(game: &mut Game, target: GameStatus) {
    debug_assert!(
        game.status.can_transition_to(target),
        "illegal transition {} -> {target}",
        game.status
    );
    game.status = target;
}

fn require_status(game: &Game, status: GameStatus, operation: &'static str) -> Result<(), GameError> {
    if game.status == status {
        Ok(())
    } else {
        Err(GameError::InvalidState {
            operation,
            status: game.status,
        })
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Seats `actor` in a waiting game. Returns the new seat index.
///
/// # Errors
/// - [`GameError::InvalidState`] unless the game is `Waiting`
/// - [`GameError::DuplicatePlayer`] if the actor already has an active seat
/// - [`GameError::GameFull`] if every seat is taken
pub fn join(
    game: &mut Game,
    actor: &Actor,
    display_name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<usize, GameError> {
    if !game.status.is_joinable() {
        return Err(GameError::InvalidState {
            operation: "join",
            status: game.status,
        });
    }
    if is_seated(game, actor) {
        return Err(GameError::DuplicatePlayer(actor.username().to_string()));
    }
    if game.active_count() >= game.max_players {
        return Err(GameError::GameFull {
            max_players: game.max_players,
        });
    }

    game.players.push(new_player(actor, display_name, now));
    Ok(game.players.len() - 1)
}

/// Checks that `actor` may start the game now.
///
/// Split out from [`start`] so callers can reject a bad request before
/// spending a round trip on the card service.
///
/// # Errors
/// - [`GameError::InvalidState`] unless the game is `Waiting`
/// - [`GameError::NotHost`] if the actor isn't the host
/// - [`GameError::InsufficientPlayers`] with fewer than two active players
pub fn ensure_can_start(game: &Game, actor: &Actor) -> Result<(), GameError> {
    require_status(game, GameStatus::Waiting, "start")?;
    let seat = seat_of(game, actor);
    if seat.is_none() || seat != game.host_index() {
        return Err(GameError::NotHost);
    }
    let active = game.active_count();
    if active < GameSettings::MIN_PLAYERS {
        return Err(GameError::InsufficientPlayers {
            active,
            required: GameSettings::MIN_PLAYERS,
        });
    }
    Ok(())
}

/// How many cards each player gets from a pool of `available`.
pub fn hand_size_for(hand_size: usize, players: usize, available: usize) -> usize {
    if players == 0 {
        return 0;
    }
    hand_size.min(available / players)
}

/// Deals `cards` and moves the game to `Active`.
///
/// Cards are dealt round-robin to active players in seat order, each
/// player getting the same number: `hand_size`, or fewer if the pool is
/// short. Surplus cards are discarded. `draw_order` records the deal
/// sequence across the whole table. The timeline gets one slot per card
/// dealt, and the host takes the first turn.
///
/// # Errors
/// Everything [`ensure_can_start`] returns, plus
/// [`CardError::Insufficient`] if the pool can't give every player even
/// one card.
pub fn start(game: &mut Game, actor: &Actor, cards: Vec<Card>, hand_size: usize) -> Result<(), GameError> {
    ensure_can_start(game, actor)?;

    let seats: Vec<usize> = game
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_active)
        .map(|(i, _)| i)
        .collect();
    let per_player = hand_size_for(hand_size, seats.len(), cards.len());
    if per_player == 0 {
        return Err(CardError::Insufficient {
            players: seats.len(),
            available: cards.len(),
        }
        .into());
    }

    let dealt = per_player * seats.len();
    for (order, card) in cards.into_iter().take(dealt).enumerate() {
        let seat = seats[order % seats.len()];
        game.players[seat].cards.push(HandCard {
            card,
            draw_order: order as u32,
        });
    }

    game.timeline_capacity = dealt as u32;
    game.current_player_index = seats[0];
    transition(game, GameStatus::Active);
    Ok(())
}

/// Places a card from the current player's hand onto the timeline.
///
/// The placement is scored against its nearest neighbours, recorded
/// whether right or wrong, and the turn passes on. When no active player
/// has cards left the game completes.
///
/// # Errors
/// - [`GameError::InvalidState`] unless the game is `Active`
/// - [`GameError::NotYourTurn`] if the actor doesn't hold the turn
/// - [`GameError::CardNotInHand`] if the card isn't theirs to place
/// - [`GameError::InvalidPosition`] outside `0..timeline_capacity`
/// - [`GameError::PositionOccupied`] if the slot is taken
pub fn place_card(
    game: &mut Game,
    actor: &Actor,
    card_id: &CardId,
    position: u32,
    accept_equal_years: bool,
    now: DateTime<Utc>,
) -> Result<PlacementResult, GameError> {
    require_status(game, GameStatus::Active, "place a card in")?;
    let seat = game.current_player_index;
    if !game
        .current_player()
        .is_some_and(|p| p.is_active && is_seat_of(p, actor))
    {
        return Err(GameError::NotYourTurn);
    }
    let hand_index = game.players[seat]
        .cards
        .iter()
        .position(|c| &c.card.id == card_id)
        .ok_or_else(|| GameError::CardNotInHand(card_id.clone()))?;
    if position >= game.timeline_capacity {
        return Err(GameError::InvalidPosition {
            position,
            capacity: game.timeline_capacity,
        });
    }
    if game.is_position_occupied(position) {
        return Err(GameError::PositionOccupied(position));
    }

    let card = game.players[seat].cards.remove(hand_index).card;
    let is_correct = crate::scoring::is_correct(&game.timeline, card.year, position, accept_equal_years);

    let player = &mut game.players[seat];
    player.placements += 1;
    if is_correct {
        player.score += 1;
    }

    game.timeline.push(Placement {
        card_id: card.id.clone(),
        title: card.title,
        year: card.year,
        position,
        placed_by: seat,
        placement_time: now,
        is_correct,
    });

    match next_turn(game, seat) {
        Some(next) => game.current_player_index = next,
        None => transition(game, GameStatus::Completed),
    }

    Ok(PlacementResult {
        is_correct,
        card_id: card.id,
        position,
    })
}

/// What a successful [`leave`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// Seat that was vacated.
    pub seat: usize,
    /// New host seat, if the leaver was the host and someone remains.
    pub new_host: Option<usize>,
}

/// Marks the actor's seat inactive.
///
/// The seat stays in the roster (with its hand and score) so placements
/// keep pointing at a valid seat. Host duty passes to the next active
/// player in seat order. If the leaver held the turn it passes on as in
/// [`place_card`]. When the last active player leaves, a waiting game is
/// cancelled and a running one completed. Leaving a finished game only
/// deactivates the seat.
///
/// # Errors
/// [`GameError::PlayerNotFound`] if the actor has no active seat.
pub fn leave(game: &mut Game, actor: &Actor) -> Result<Departure, GameError> {
    let seat = seat_of(game, actor).ok_or(GameError::PlayerNotFound)?;
    let was_host = game.host_index() == Some(seat);

    game.players[seat].is_active = false;
    let new_host = if was_host { game.host_index() } else { None };

    match game.status {
        GameStatus::Waiting if game.active_count() == 0 => transition(game, GameStatus::Cancelled),
        GameStatus::Active if game.active_count() == 0 => transition(game, GameStatus::Completed),
        GameStatus::Active if game.current_player_index == seat => match next_turn(game, seat) {
            Some(next) => game.current_player_index = next,
            None => transition(game, GameStatus::Completed),
        },
        _ => {}
    }

    Ok(Departure { seat, new_host })
}

/// Ends a running game early on the host's say-so.
///
/// # Errors
/// - [`GameError::InvalidState`] unless the game is `Active`
/// - [`GameError::PlayerNotFound`] if the actor has no active seat
/// - [`GameError::NotHost`] if the actor isn't the host
pub fn end(game: &mut Game, actor: &Actor) -> Result<(), GameError> {
    require_status(game, GameStatus::Active, "end")?;
    let seat = seat_of(game, actor).ok_or(GameError::PlayerNotFound)?;
    if game.host_index() != Some(seat) {
        return Err(GameError::NotHost);
    }
    transition(game, GameStatus::Completed);
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use histime_protocol::{Difficulty, GameId, RoomCode};

    fn card(id: &str, year: i32) -> Card {
        Card {
            id: CardId(id.into()),
            title: format!("event {id}"),
            year,
            category: "history".into(),
            difficulty: Difficulty::Medium,
        }
    }

    fn deck(n: usize) -> Vec<Card> {
        (0..n).map(|i| card(&format!("c{i}"), 1000 + i as i32 * 10)).collect()
    }

    fn new_game(max_players: usize) -> (Game, Actor) {
        let host = Actor::guest("ann");
        let game = Game::new(
            GameId::new(),
            RoomCode::parse("ABC123").unwrap(),
            GameSettings {
                difficulty: Difficulty::Medium,
                categories: vec![],
                max_players,
            },
            new_player(&host, None, Utc::now()),
            Utc::now(),
        );
        (game, host)
    }

    /// A started two-player game where ann holds c0,c2 and bob holds c1,c3.
    fn running_game() -> (Game, Actor, Actor) {
        let (mut game, ann) = new_game(4);
        let bob = Actor::guest("bob");
        join(&mut game, &bob, None, Utc::now()).unwrap();
        start(&mut game, &ann, deck(4), 2).unwrap();
        (game, ann, bob)
    }

    fn hand_ids(game: &Game, seat: usize) -> Vec<String> {
        game.players[seat].cards.iter().map(|c| c.card.id.0.clone()).collect()
    }

    // -- seats --

    #[test]
    fn test_is_seat_of_guest_matches_case_insensitively() {
        let player = new_player(&Actor::guest("Ann"), None, Utc::now());
        assert!(is_seat_of(&player, &Actor::guest("ann")));
        assert!(!is_seat_of(&player, &Actor::guest("bob")));
    }

    #[test]
    fn test_is_seat_of_guest_ids_must_agree_when_both_present() {
        let seat_actor = Actor::Guest {
            username: "ann".into(),
            guest_id: Some("g-1".into()),
        };
        let player = new_player(&seat_actor, None, Utc::now());
        let impostor = Actor::Guest {
            username: "ann".into(),
            guest_id: Some("g-2".into()),
        };
        assert!(is_seat_of(&player, &seat_actor));
        assert!(!is_seat_of(&player, &impostor));
        assert!(is_seat_of(&player, &Actor::guest("ann")));
    }

    #[test]
    fn test_is_seat_of_guest_never_matches_account_seat() {
        let player = new_player(&Actor::authenticated("u1", "ann"), None, Utc::now());
        assert!(!is_seat_of(&player, &Actor::guest("ann")));
        assert!(is_seat_of(&player, &Actor::authenticated("u1", "whoever")));
    }

    #[test]
    fn test_new_player_display_name_only_for_accounts() {
        let acct = new_player(&Actor::authenticated("u1", "ann"), Some("Annie"), Utc::now());
        assert_eq!(acct.username, "Annie");
        let blank = new_player(&Actor::authenticated("u1", "ann"), Some("  "), Utc::now());
        assert_eq!(blank.username, "ann");
        let guest = new_player(&Actor::guest("bob"), Some("Robert"), Utc::now());
        assert_eq!(guest.username, "bob");
    }

    // -- join --

    #[test]
    fn test_join_appends_seat() {
        let (mut game, _) = new_game(4);
        let seat = join(&mut game, &Actor::guest("bob"), None, Utc::now()).unwrap();
        assert_eq!(seat, 1);
        assert_eq!(game.players[1].username, "bob");
        assert!(game.players[1].is_active);
    }

    #[test]
    fn test_join_duplicate_rejected() {
        let (mut game, ann) = new_game(4);
        let result = join(&mut game, &ann, None, Utc::now());
        assert!(matches!(result, Err(GameError::DuplicatePlayer(_))));
        assert_eq!(game.players.len(), 1);
    }

    #[test]
    fn test_join_same_guest_name_other_guest_id_rejected() {
        let ann = Actor::Guest {
            username: "ann".into(),
            guest_id: Some("g-1".into()),
        };
        let (mut game, _) = new_game(4);
        game.players[0] = new_player(&ann, None, Utc::now());

        let other_ann = Actor::Guest {
            username: "ANN".into(),
            guest_id: Some("g-2".into()),
        };
        let result = join(&mut game, &other_ann, None, Utc::now());
        assert!(matches!(result, Err(GameError::DuplicatePlayer(_))));
        assert_eq!(game.players.len(), 1);
        // The existing seat is still only reachable with the right guest id.
        assert_eq!(seat_of(&game, &ann), Some(0));
        assert_eq!(seat_of(&game, &other_ann), None);
    }

    #[test]
    fn test_join_account_sharing_guest_name_allowed() {
        let (mut game, _) = new_game(4);
        let seat = join(&mut game, &Actor::authenticated("u1", "ann"), None, Utc::now()).unwrap();
        assert_eq!(seat, 1);
    }

    #[test]
    fn test_join_full_game_rejected() {
        let (mut game, _) = new_game(2);
        join(&mut game, &Actor::guest("bob"), None, Utc::now()).unwrap();
        let result = join(&mut game, &Actor::guest("cat"), None, Utc::now());
        assert!(matches!(result, Err(GameError::GameFull { max_players: 2 })));
    }

    #[test]
    fn test_join_after_leave_reuses_capacity() {
        let (mut game, _) = new_game(2);
        let bob = Actor::guest("bob");
        join(&mut game, &bob, None, Utc::now()).unwrap();
        leave(&mut game, &bob).unwrap();
        // bob can come back into a fresh seat.
        let seat = join(&mut game, &bob, None, Utc::now()).unwrap();
        assert_eq!(seat, 2);
        assert_eq!(game.active_count(), 2);
    }

    #[test]
    fn test_join_running_game_rejected() {
        let (mut game, _, _) = running_game();
        let result = join(&mut game, &Actor::guest("cat"), None, Utc::now());
        assert!(matches!(
            result,
            Err(GameError::InvalidState {
                status: GameStatus::Active,
                ..
            })
        ));
    }

    // -- start --

    #[test]
    fn test_start_deals_round_robin() {
        let (game, _, _) = running_game();
        assert_eq!(game.status, GameStatus::Active);
        assert_eq!(hand_ids(&game, 0), vec!["c0", "c2"]);
        assert_eq!(hand_ids(&game, 1), vec!["c1", "c3"]);
        assert_eq!(game.timeline_capacity, 4);
        assert_eq!(game.current_player_index, 0);
        let orders: Vec<u32> = game.players[1].cards.iter().map(|c| c.draw_order).collect();
        assert_eq!(orders, vec![1, 3]);
    }

    #[test]
    fn test_start_short_deck_deals_evenly() {
        let (mut game, ann) = new_game(4);
        join(&mut game, &Actor::guest("bob"), None, Utc::now()).unwrap();
        join(&mut game, &Actor::guest("cat"), None, Utc::now()).unwrap();
        start(&mut game, &ann, deck(7), 5).unwrap();
        for seat in 0..3 {
            assert_eq!(game.players[seat].cards.len(), 2);
        }
        assert_eq!(game.timeline_capacity, 6);
    }

    #[test]
    fn test_start_skips_departed_players() {
        let (mut game, ann) = new_game(4);
        let bob = Actor::guest("bob");
        join(&mut game, &bob, None, Utc::now()).unwrap();
        join(&mut game, &Actor::guest("cat"), None, Utc::now()).unwrap();
        leave(&mut game, &bob).unwrap();
        start(&mut game, &ann, deck(4), 2).unwrap();
        assert!(game.players[1].cards.is_empty());
        assert_eq!(hand_ids(&game, 2), vec!["c1", "c3"]);
    }

    #[test]
    fn test_start_by_non_host_rejected() {
        let (mut game, _) = new_game(4);
        let bob = Actor::guest("bob");
        join(&mut game, &bob, None, Utc::now()).unwrap();
        let result = start(&mut game, &bob, deck(4), 2);
        assert!(matches!(result, Err(GameError::NotHost)));
        assert_eq!(game.status, GameStatus::Waiting);
        assert!(game.players.iter().all(|p| p.cards.is_empty()));
    }

    #[test]
    fn test_start_by_outsider_rejected() {
        let (mut game, _) = new_game(4);
        join(&mut game, &Actor::guest("bob"), None, Utc::now()).unwrap();
        let result = start(&mut game, &Actor::guest("eve"), deck(4), 2);
        assert!(matches!(result, Err(GameError::NotHost)));
    }

    #[test]
    fn test_start_alone_rejected() {
        let (mut game, ann) = new_game(4);
        let result = start(&mut game, &ann, deck(4), 2);
        assert!(matches!(
            result,
            Err(GameError::InsufficientPlayers { active: 1, required: 2 })
        ));
    }

    #[test]
    fn test_start_twice_rejected() {
        let (mut game, ann, _) = running_game();
        let result = start(&mut game, &ann, deck(4), 2);
        assert!(matches!(result, Err(GameError::InvalidState { .. })));
    }

    #[test]
    fn test_start_too_few_cards_fails_without_change() {
        let (mut game, ann) = new_game(4);
        join(&mut game, &Actor::guest("bob"), None, Utc::now()).unwrap();
        let result = start(&mut game, &ann, deck(1), 5);
        assert!(matches!(
            result,
            Err(GameError::Cards(CardError::Insufficient { players: 2, available: 1 }))
        ));
        assert_eq!(game.status, GameStatus::Waiting);
    }

    #[test]
    fn test_hand_size_for() {
        assert_eq!(hand_size_for(5, 2, 48), 5);
        assert_eq!(hand_size_for(5, 3, 7), 2);
        assert_eq!(hand_size_for(5, 3, 2), 0);
        assert_eq!(hand_size_for(5, 0, 10), 0);
    }

    // -- place_card --

    #[test]
    fn test_place_card_first_is_correct_and_advances_turn() {
        let (mut game, ann, _) = running_game();
        let result = place_card(&mut game, &ann, &CardId("c0".into()), 2, true, Utc::now()).unwrap();
        assert!(result.is_correct);
        assert_eq!(result.position, 2);
        assert_eq!(game.timeline.len(), 1);
        assert_eq!(game.timeline[0].placed_by, 0);
        assert_eq!(game.players[0].score, 1);
        assert_eq!(game.players[0].placements, 1);
        assert_eq!(hand_ids(&game, 0), vec!["c2"]);
        assert_eq!(game.current_player_index, 1);
    }

    #[test]
    fn test_place_card_wrong_order_scores_nothing() {
        let (mut game, ann, bob) = running_game();
        // c0 = 1000 at slot 2.
        place_card(&mut game, &ann, &CardId("c0".into()), 2, true, Utc::now()).unwrap();
        // c1 = 1010 placed before it: wrong.
        let result = place_card(&mut game, &bob, &CardId("c1".into()), 0, true, Utc::now()).unwrap();
        assert!(!result.is_correct);
        assert_eq!(game.players[1].score, 0);
        assert_eq!(game.players[1].placements, 1);
        assert!(!game.timeline[1].is_correct);
    }

    #[test]
    fn test_place_card_out_of_turn_rejected() {
        let (mut game, _, bob) = running_game();
        let before = game.clone();
        let result = place_card(&mut game, &bob, &CardId("c1".into()), 0, true, Utc::now());
        assert!(matches!(result, Err(GameError::NotYourTurn)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_place_card_not_in_hand_rejected() {
        let (mut game, ann, _) = running_game();
        let result = place_card(&mut game, &ann, &CardId("c1".into()), 0, true, Utc::now());
        assert!(matches!(result, Err(GameError::CardNotInHand(_))));
    }

    #[test]
    fn test_place_card_occupied_position_rejected() {
        let (mut game, ann, bob) = running_game();
        place_card(&mut game, &ann, &CardId("c0".into()), 1, true, Utc::now()).unwrap();
        let result = place_card(&mut game, &bob, &CardId("c1".into()), 1, true, Utc::now());
        assert!(matches!(result, Err(GameError::PositionOccupied(1))));
        assert_eq!(hand_ids(&game, 1), vec!["c1", "c3"]);
    }

    #[test]
    fn test_place_card_out_of_range_rejected() {
        let (mut game, ann, _) = running_game();
        let result = place_card(&mut game, &ann, &CardId("c0".into()), 4, true, Utc::now());
        assert!(matches!(
            result,
            Err(GameError::InvalidPosition { position: 4, capacity: 4 })
        ));
    }

    #[test]
    fn test_place_card_waiting_game_rejected() {
        let (mut game, ann) = new_game(4);
        let result = place_card(&mut game, &ann, &CardId("c0".into()), 0, true, Utc::now());
        assert!(matches!(result, Err(GameError::InvalidState { .. })));
    }

    #[test]
    fn test_place_card_last_card_completes_game() {
        let (mut game, ann, bob) = running_game();
        place_card(&mut game, &ann, &CardId("c0".into()), 0, true, Utc::now()).unwrap();
        place_card(&mut game, &bob, &CardId("c1".into()), 1, true, Utc::now()).unwrap();
        place_card(&mut game, &ann, &CardId("c2".into()), 2, true, Utc::now()).unwrap();
        assert_eq!(game.status, GameStatus::Active);
        place_card(&mut game, &bob, &CardId("c3".into()), 3, true, Utc::now()).unwrap();
        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.timeline.len(), 4);
        assert_eq!(game.players[0].score + game.players[1].score, 4);
    }

    // -- leave --

    #[test]
    fn test_leave_host_transfers_host() {
        let (mut game, ann) = new_game(4);
        join(&mut game, &Actor::guest("bob"), None, Utc::now()).unwrap();
        let departure = leave(&mut game, &ann).unwrap();
        assert_eq!(departure, Departure { seat: 0, new_host: Some(1) });
        assert_eq!(game.host_index(), Some(1));
        assert_eq!(game.status, GameStatus::Waiting);
    }

    #[test]
    fn test_leave_host_new_host_can_start() {
        let (mut game, ann) = new_game(4);
        let bob = Actor::guest("bob");
        let cat = Actor::guest("cat");
        join(&mut game, &bob, None, Utc::now()).unwrap();
        join(&mut game, &cat, None, Utc::now()).unwrap();
        leave(&mut game, &ann).unwrap();

        assert!(matches!(start(&mut game, &cat, deck(4), 2), Err(GameError::NotHost)));
        start(&mut game, &bob, deck(4), 2).unwrap();
        assert_eq!(game.status, GameStatus::Active);
        assert_eq!(game.current_player_index, 1);
        assert!(game.players[0].cards.is_empty());
        assert_eq!(hand_ids(&game, 1), vec!["c0", "c2"]);
    }

    #[test]
    fn test_leave_last_waiting_player_cancels() {
        let (mut game, ann) = new_game(4);
        leave(&mut game, &ann).unwrap();
        assert_eq!(game.status, GameStatus::Cancelled);
    }

    #[test]
    fn test_leave_on_turn_passes_turn() {
        let (mut game, ann) = new_game(4);
        let bob = Actor::guest("bob");
        let cat = Actor::guest("cat");
        join(&mut game, &bob, None, Utc::now()).unwrap();
        join(&mut game, &cat, None, Utc::now()).unwrap();
        start(&mut game, &ann, deck(6), 2).unwrap();
        place_card(&mut game, &ann, &CardId("c0".into()), 0, true, Utc::now()).unwrap();
        assert_eq!(game.current_player_index, 1);
        leave(&mut game, &bob).unwrap();
        assert_eq!(game.current_player_index, 2);
        assert_eq!(game.status, GameStatus::Active);
    }

    #[test]
    fn test_leave_leaving_sole_card_holder_completes() {
        let (mut game, ann, bob) = running_game();
        place_card(&mut game, &ann, &CardId("c0".into()), 0, true, Utc::now()).unwrap();
        place_card(&mut game, &bob, &CardId("c1".into()), 1, true, Utc::now()).unwrap();
        place_card(&mut game, &ann, &CardId("c2".into()), 2, true, Utc::now()).unwrap();
        // Only bob holds a card and it's his turn.
        leave(&mut game, &bob).unwrap();
        assert_eq!(game.status, GameStatus::Completed);
    }

    #[test]
    fn test_leave_everyone_completes_running_game() {
        let (mut game, ann, bob) = running_game();
        leave(&mut game, &bob).unwrap();
        assert_eq!(game.status, GameStatus::Active);
        leave(&mut game, &ann).unwrap();
        assert_eq!(game.status, GameStatus::Completed);
    }

    #[test]
    fn test_leave_twice_rejected() {
        let (mut game, _, bob) = running_game();
        leave(&mut game, &bob).unwrap();
        assert!(matches!(leave(&mut game, &bob), Err(GameError::PlayerNotFound)));
    }

    #[test]
    fn test_leave_keeps_seat_history() {
        let (mut game, ann, bob) = running_game();
        place_card(&mut game, &ann, &CardId("c0".into()), 0, true, Utc::now()).unwrap();
        leave(&mut game, &ann).unwrap();
        assert_eq!(game.players.len(), 2);
        assert_eq!(game.players[0].score, 1);
        assert!(!game.players[0].is_active);
        assert_eq!(game.current_player_index, 1);
        assert!(seat_of(&game, &bob).is_some());
    }

    // -- end --

    #[test]
    fn test_end_by_host_completes() {
        let (mut game, ann, _) = running_game();
        end(&mut game, &ann).unwrap();
        assert_eq!(game.status, GameStatus::Completed);
    }

    #[test]
    fn test_end_by_non_host_rejected() {
        let (mut game, _, bob) = running_game();
        assert!(matches!(end(&mut game, &bob), Err(GameError::NotHost)));
        assert_eq!(game.status, GameStatus::Active);
    }

    #[test]
    fn test_end_waiting_game_rejected() {
        let (mut game, ann) = new_game(4);
        assert!(matches!(end(&mut game, &ann), Err(GameError::InvalidState { .. })));
    }
}
