//! Room code generation.

use std::sync::atomic::{AtomicUsize, Ordering};

use histime_protocol::RoomCode;
use rand::Rng;

use crate::GameError;

/// Produces candidate room codes. Uniqueness is checked by the registry,
/// not here.
pub trait CodeGenerator: Send + Sync + 'static {
    fn next_code(&self) -> RoomCode;
}

/// Uniformly random codes over [`RoomCode::ALPHABET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodes;

impl CodeGenerator for RandomCodes {
    fn next_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        let indices = std::array::from_fn(|_| rng.random_range(0..RoomCode::ALPHABET.len()));
        RoomCode::from_indices(indices)
    }
}

/// Hands out a fixed list of codes in order, cycling when exhausted.
///
/// Useful for demos and for tests that need to force collisions.
#[derive(Debug)]
pub struct SequenceCodes {
    codes: Vec<RoomCode>,
    next: AtomicUsize,
}

impl SequenceCodes {
    /// # Errors
    /// Returns [`GameError::InvalidConfig`] for an empty list.
    pub fn new(codes: Vec<RoomCode>) -> Result<Self, GameError> {
        if codes.is_empty() {
            return Err(GameError::InvalidConfig("code sequence is empty".into()));
        }
        Ok(Self {
            codes,
            next: AtomicUsize::new(0),
        })
    }
}

impl CodeGenerator for SequenceCodes {
    fn next_code(&self) -> RoomCode {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.codes[i % self.codes.len()].clone()
    }
}
