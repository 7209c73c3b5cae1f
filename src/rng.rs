//! injected random source for world generation
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform integer draws. Every generation pass takes one of these instead of
/// reaching for a global generator, so a fixed draw sequence gives a fixed world.
pub trait TileRng {
    /// uniform in `[0, bound)`; `bound` must be positive
    fn next_int(&mut self, bound: i32) -> i32;

    /// `true` with `percent`% probability (one draw)
    #[inline]
    fn chance(&mut self, percent: i32) -> bool {
        self.next_int(100) < percent
    }

    /// uniform in `[min, max]` (one draw)
    #[inline]
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        self.next_int(max - min + 1) + min
    }
}

impl<R: RngCore> TileRng for R {
    #[inline]
    fn next_int(&mut self, bound: i32) -> i32 {
        self.gen_range(0..bound)
    }
}

/// world rng: seeded when a seed is configured, entropy otherwise
pub fn world_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/* ===========================================================
   scripted draws (tests only)
   =========================================================== */
