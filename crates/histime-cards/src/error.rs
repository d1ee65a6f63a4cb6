//! Error types for the card layer.

use histime_protocol::Difficulty;

/// Errors that can occur while drawing cards.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// No card in the catalogue matches the requested filters.
    #[error("no {difficulty} cards in categories {categories:?}")]
    NoMatchingCards {
        difficulty: Difficulty,
        categories: Vec<String>,
    },

    /// Too few cards came back to give every player at least one.
    #[error("drew {available} cards for {players} players")]
    Insufficient { players: usize, available: usize },

    /// The catalogue itself is malformed (duplicate ids, bad file).
    #[error("invalid card catalogue: {0}")]
    Catalogue(String),

    /// A remote card service could not be reached.
    #[error("card service unavailable: {0}")]
    Unavailable(String),
}
