//! Mystery movie selection: one stable pick per calendar day, plus seeded
//! random picks for replay sessions.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::calendar::DateKey;
use crate::constants::DAILY_HASH_SEED;
use crate::movie::MovieId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    #[error("movie catalog has no candidates")]
    EmptyCatalog,
}

fn date_hash(date: DateKey) -> u64 {
    let mut hasher = XxHash64::with_seed(DAILY_HASH_SEED);
    hasher.write(date.to_string().as_bytes());
    hasher.finish()
}

fn index_for(value: u64, len: usize) -> usize {
    let len64 = u64::try_from(len).unwrap_or(u64::MAX);
    usize::try_from(value % len64).unwrap_or(0)
}

/// Maps a calendar day to the same catalog entry for every player.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailySelector;

impl DailySelector {
    /// # Errors
    ///
    /// Returns [`SelectError::EmptyCatalog`] when `ids` is empty.
    pub fn select(date: DateKey, ids: &[MovieId]) -> Result<MovieId, SelectError> {
        if ids.is_empty() {
            return Err(SelectError::EmptyCatalog);
        }
        let id = ids[index_for(date_hash(date), ids.len())];
        log::debug!("daily pick for {date}: movie {id}");
        Ok(id)
    }
}

/// Uniform pick driven by a session seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSelector {
    seed: u64,
}

impl RandomSelector {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Selector with a fresh seed drawn from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(generate_session_seed())
    }

    #[must_use]
    pub const fn seed(self) -> u64 {
        self.seed
    }

    /// # Errors
    ///
    /// Returns [`SelectError::EmptyCatalog`] when `ids` is empty.
    pub fn select(self, ids: &[MovieId]) -> Result<MovieId, SelectError> {
        if ids.is_empty() {
            return Err(SelectError::EmptyCatalog);
        }
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        let id = ids[rng.gen_range(0..ids.len())];
        log::debug!("random pick for seed {}: movie {id}", self.seed);
        Ok(id)
    }
}

/// Fresh, non-reproducible seed for a replay session.
#[must_use]
pub fn generate_session_seed() -> u64 {
    rand::random()
}
