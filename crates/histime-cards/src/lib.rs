//! Card draw service for History Time.
//!
//! The game engine never owns the card catalogue. It asks a [`CardSource`]
//! for a randomized set of events matching the game's difficulty and
//! categories, and copies what it gets into the players' hands.
//!
//! [`CardDeck`] is the in-process implementation: a catalogue held in
//! memory, either the built-in set of events or one loaded from JSON.

#![allow(async_fn_in_trait)]

mod builtin;
mod deck;
mod error;

pub use deck::{CardDeck, CardSource};
pub use error::CardError;
