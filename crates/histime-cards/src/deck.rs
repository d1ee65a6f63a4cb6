//! The `CardSource` trait and the in-memory `CardDeck`.

use std::collections::HashSet;
use std::path::Path;

use histime_protocol::{Card, Difficulty};
use rand::seq::SliceRandom;

use crate::CardError;

/// Supplies randomized historical-event cards.
///
/// Treated as a stateless external service: the engine calls it once per
/// game start and never again.
pub trait CardSource: Send + Sync + 'static {
    /// Draws up to `count` distinct cards of `difficulty`.
    ///
    /// An empty `categories` slice means any category. Implementations may
    /// return fewer than `count` cards when the catalogue runs short; the
    /// caller decides whether that is enough.
    ///
    /// # Errors
    /// - [`CardError::NoMatchingCards`]: nothing matches the filters
    /// - [`CardError::Unavailable`]: the backing service is down
    fn draw_hand(
        &self,
        difficulty: Difficulty,
        categories: &[String],
        count: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Card>, CardError>> + Send;
}

/// An in-memory card catalogue.
#[derive(Debug, Clone)]
pub struct CardDeck {
    cards: Vec<Card>,
}

impl CardDeck {
    /// Builds a deck from a list of cards.
    ///
    /// # Errors
    /// Returns [`CardError::Catalogue`] if two cards share an id.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, CardError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(&card.id) {
                return Err(CardError::Catalogue(format!("duplicate card id {}", card.id)));
            }
        }
        Ok(Self { cards })
    }

    /// The catalogue shipped with the server.
    pub fn builtin() -> Self {
        Self {
            cards: crate::builtin::cards(),
        }
    }

    /// Loads a catalogue from a JSON array of cards.
    ///
    /// # Errors
    /// Returns [`CardError::Catalogue`] if the file can't be read, parsed,
    /// or contains duplicate ids.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CardError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CardError::Catalogue(format!("{}: {e}", path.display())))?;
        let cards: Vec<Card> = serde_json::from_slice(&bytes)
            .map_err(|e| CardError::Catalogue(format!("{}: {e}", path.display())))?;
        let deck = Self::from_cards(cards)?;
        tracing::info!(path = %path.display(), cards = deck.len(), "card catalogue loaded");
        Ok(deck)
    }

    /// Number of cards in the catalogue.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards matching a difficulty and (optional) category filter.
    /// Categories compare case-insensitively.
    pub fn matching<'a>(
        &'a self,
        difficulty: Difficulty,
        categories: &'a [String],
    ) -> impl Iterator<Item = &'a Card> + 'a {
        self.cards.iter().filter(move |card| {
            card.difficulty == difficulty
                && (categories.is_empty()
                    || categories
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(&card.category)))
        })
    }

    fn sample(
        &self,
        difficulty: Difficulty,
        categories: &[String],
        count: usize,
    ) -> Result<Vec<Card>, CardError> {
        let mut pool: Vec<&Card> = self.matching(difficulty, categories).collect();
        if pool.is_empty() {
            return Err(CardError::NoMatchingCards {
                difficulty,
                categories: categories.to_vec(),
            });
        }
        pool.shuffle(&mut rand::rng());
        pool.truncate(count);
        Ok(pool.into_iter().cloned().collect())
    }
}

impl CardSource for CardDeck {
    async fn draw_hand(
        &self,
        difficulty: Difficulty,
        categories: &[String],
        count: usize,
    ) -> Result<Vec<Card>, CardError> {
        let cards = self.sample(difficulty, categories, count)?;
        if cards.len() < count {
            tracing::debug!(
                %difficulty,
                requested = count,
                drawn = cards.len(),
                "catalogue ran short"
            );
        }
        Ok(cards)
    }
}
