//! Random sampling for role dealing and seat draws.
//!
//! Role assignment and the king/lady draw are the only random operations in
//! the engine, and both must be statistically uniform: a predictable role
//! deal leaks hidden information. `GameRng` wraps ChaCha8 so production
//! callers seed from entropy while tests pin a seed and get a reproducible
//! game.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform RNG used by [`Game::play`](crate::game::Game::play).
///
/// Same seed, same deal.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a deterministic RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Uniformly shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Draw two distinct indices from `0..len`, uniformly without
    /// replacement.
    ///
    /// Returns `None` when `len < 2`.
    pub fn sample_two(&mut self, len: usize) -> Option<(usize, usize)> {
        if len < 2 {
            return None;
        }
        let picked = rand::seq::index::sample(&mut self.inner, len, 2);
        Some((picked.index(0), picked.index(1)))
    }

    /// Generate a random token for lock ownership checks.
    #[must_use]
    pub fn gen_token(&mut self) -> u64 {
        self.inner.gen()
    }
}
