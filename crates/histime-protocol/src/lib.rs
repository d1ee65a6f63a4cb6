//! Shared vocabulary for History Time.
//!
//! This crate defines the data every other layer agrees on:
//!
//! - **Identifiers** ([`GameId`], [`RoomCode`], [`UserId`], [`CardId`]):
//!   newtypes so a room code can never be passed where a game id is expected.
//! - **Model** ([`Game`], [`Player`], [`Placement`], [`HandCard`], [`Card`]):
//!   the game aggregate exactly as it is persisted.
//! - **Views** ([`GameView`]): the projection sent to clients, with the
//!   years of unplayed cards hidden.
//! - **Wire bodies** ([`CreateGameRequest`], [`PlaceCardRequest`], ...):
//!   JSON request/response shapes of the HTTP boundary.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): byte encoding used for
//!   snapshots.
//!
//! # Architecture
//!
//! ```text
//! HTTP (histime) → Room (state machine) → Store / Cards
//!           ↘            ↓             ↙
//!             Protocol (this crate)
//! ```
//!
//! The protocol crate has no behaviour beyond small read-only helpers on
//! the aggregate. All transitions live in `histime-room`.

mod codec;
mod error;
mod types;
mod view;
mod wire;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Card, CardId, Difficulty, Game, GameId, GameSettings, GameStatus, HandCard,
    Placement, Player, RoomCode, UserId,
};
pub use view::{GameView, HandCardView, PlayerView, Standing};
pub use wire::{
    CreateGameRequest, ErrorBody, GameResponse, GuestFields, PlaceCardRequest,
    PlaceCardResponse, PlacementResult,
};
