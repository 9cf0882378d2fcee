// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design Philosophy
//!
//! The basket pricer splits its paths across parallel contexts. Every context
//! draws from its own stream:
//! 1. **Reproducibility**: same `(base_seed, context_id)` → same stream
//! 2. **Parallel safety**: no generator state is shared between threads
//! 3. **Independence**: nearby context ids map to unrelated seeds
//!
//! # Stream Seeding
//!
//! Context seeds are derived with the splitmix64 finalizer:
//! ```text
//! z = base_seed + (context_id + 1) * 0x9e3779b97f4a7c15
//! z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
//! z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
//! seed = z ⊕ (z >> 31)
//! ```
//! The mixed seed then initialises a `StdRng`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// splitmix64 finalizer
#[inline]
pub fn mix_seed(base_seed: u64, stream_id: u64) -> u64 {
    let mut z = base_seed.wrapping_add(stream_id.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Seed of the stream owned by `context_id`
    pub fn stream_seed(&self, context_id: u64) -> u64 {
        mix_seed(self.base_seed, context_id)
    }

    /// Create the private generator for a worker context
    pub fn create_std_rng(&self, context_id: u64) -> StdRng {
        StdRng::seed_from_u64(self.stream_seed(context_id))
    }
}

/// Overwrite `out` with independent standard normal draws
pub fn fill_standard_normals<R: Rng + ?Sized>(rng: &mut R, out: &mut [f64]) {
    for z in out.iter_mut() {
        *z = StandardNormal.sample(rng);
    }
}
