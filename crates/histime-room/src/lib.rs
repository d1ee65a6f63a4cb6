//! Game lifecycle for History Time.
//!
//! This is where the rules live. A game is a single aggregate that every
//! operation loads, transforms, and saves as one unit, under a per-game
//! lock so two players racing for the same turn can never both win.
//!
//! # Key types
//!
//! - [`engine`]: the pure state machine: `join`, `start`, `place_card`,
//!   `leave`, `end`. No I/O, no clocks, no logging.
//! - [`scoring`]: chronological correctness of a placement
//! - [`RoomRegistry`]: allocates room codes and creates games
//! - [`GameLocks`]: per-game mutual exclusion
//! - [`GameService`]: lock → load → apply → save, the entry point for
//!   higher layers
//! - [`GameRules`]: tunables (hand size, code attempts, tie policy)

#![allow(async_fn_in_trait)]

mod code;
mod config;
pub mod engine;
mod error;
mod locks;
mod registry;
pub mod scoring;
mod service;

pub use code::{CodeGenerator, RandomCodes, SequenceCodes};
pub use config::GameRules;
pub use engine::Departure;
pub use error::GameError;
pub use locks::GameLocks;
pub use registry::RoomRegistry;
pub use service::GameService;
