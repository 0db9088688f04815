//! Seeded shuffling for deals.
//!
//! The same seed always produces the same deal, which keeps replays and
//! tests reproducible.
//!
//! ```
//! use patience::core::GameRng;
//!
//! let mut a = GameRng::new(7).for_context("deal");
//! let mut b = GameRng::new(7).for_context("deal");
//!
//! let mut left: Vec<u32> = (0..52).collect();
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//! assert_eq!(left, right);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// ChaCha8 stream remembered together with its seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this stream was created from. Logged with every deal.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive a separate stream named `context` from this seed.
    ///
    /// Deals drawn from `for_context("deal")` stay the same when other
    /// consumers of the seed are added.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        (self.seed, context).hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, cards: &mut [T]) {
        cards.shuffle(&mut self.stream);
    }
}
