//! Deterministic random number generation for battles.
//!
//! Every random decision in a battle (deck shuffles, target shuffles,
//! bounce picks, burn picks, Confused redirects, random damage rolls)
//! draws from the single `GameRng` owned by the battle state, so a seed
//! plus the same inputs replays the same battle.
//!
//! ```
//! use row_battle::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll_percent(), b.roll_percent());
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random integer in `min..=max`.
    ///
    /// `max` below `min` is clamped to `min`.
    pub fn gen_inclusive(&mut self, min: i32, max: i32) -> i32 {
        self.inner.gen_range(min..=max.max(min))
    }

    /// Pick an index into a collection of `len` elements.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.inner.gen_range(0..len))
    }

    /// Roll a percentage in `1..=100`.
    pub fn roll_percent(&mut self) -> u8 {
        self.inner.gen_range(1..=100)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}
