//! # History Time
//!
//! Server for a multiplayer timeline game: players take turns placing
//! historical-event cards onto a shared timeline, scoring a point for
//! every card that lands in chronological order.
//!
//! This crate is the HTTP boundary. It turns requests into [`Actor`]s and
//! calls into [`GameService`], which owns the rules. Everything below it
//! is pluggable through traits: [`GameStore`] for persistence,
//! [`CardSource`] for the card supply, [`Authenticator`] for tokens.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use histime::prelude::*;
//!
//! # async fn run() -> Result<(), HistimeError> {
//! let server = HistimeServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(MemoryStore::new(), CardDeck::builtin(), TokenTable::new())
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! [`Actor`]: histime_session::Actor
//! [`GameService`]: histime_room::GameService
//! [`GameStore`]: histime_store::GameStore
//! [`CardSource`]: histime_cards::CardSource
//! [`Authenticator`]: histime_session::Authenticator

mod error;
mod handler;
mod server;

pub use error::HistimeError;
pub use handler::{AppState, router};
pub use server::{HistimeServer, HistimeServerBuilder};

/// Everything needed to assemble and run a server.
pub mod prelude {
    pub use crate::{AppState, HistimeError, HistimeServer, HistimeServerBuilder, router};
    pub use histime_cards::{CardDeck, CardError, CardSource};
    pub use histime_protocol::{
        Card, CardId, Difficulty, Game, GameId, GameStatus, GameView, RoomCode,
    };
    pub use histime_room::{GameError, GameRules, GameService};
    pub use histime_session::{
        Actor, AuthenticatedUser, Authenticator, IdentityConfig, IdentityError,
        IdentityResolver, TokenTable,
    };
    pub use histime_store::{GameStore, MemoryStore, StoreError};
}
