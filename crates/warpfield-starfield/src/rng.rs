//! Seeded pseudo-random source used by the random placement generator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic uniform source. The same seed always yields the same sequence.
#[derive(Clone, Debug)]
pub struct StarRng {
    inner: ChaCha8Rng,
}

impl StarRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    pub fn next_u32(&mut self) -> u32 {
        self.inner.random::<u32>()
    }
}
