//! Deterministic seed derivation.
//!
//! A world seed string is hashed to a `u64`, which in turn seeds a ChaCha8 stream
//! drawing the three noise-space origins (terrain, temperature, rainfall) that
//! make up a [`GenerationContext`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Origins are drawn from `[-ORIGIN_RANGE, ORIGIN_RANGE)` on each axis.
pub const ORIGIN_RANGE: i32 = 9999;

/// Hash an arbitrary seed string to a `u64` world seed.
///
/// Uses SipHash (via std's `DefaultHasher`) with its fixed default keys, so the
/// same string maps to the same seed on every run.
pub fn hash_seed(seed: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    hasher.finish()
}

/// Everything that makes one world differ from another, owned by the generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationContext {
    /// The numeric world seed.
    pub seed: u64,
    /// Noise-space origin of the height field.
    pub terrain_origin: DVec2,
    /// Noise-space origin of the temperature field.
    pub temperature_origin: DVec2,
    /// Noise-space origin of the rainfall field.
    pub rainfall_origin: DVec2,
}

impl GenerationContext {
    /// Derive the origins for a numeric seed.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut origin = || {
            let x = rng.random_range(-ORIGIN_RANGE..ORIGIN_RANGE);
            let y = rng.random_range(-ORIGIN_RANGE..ORIGIN_RANGE);
            DVec2::new(f64::from(x), f64::from(y))
        };

        let terrain_origin = origin();
        let temperature_origin = origin();
        let rainfall_origin = origin();

        Self {
            seed,
            terrain_origin,
            temperature_origin,
            rainfall_origin,
        }
    }

    /// Derive the origins for a seed string.
    pub fn from_seed_str(seed: &str) -> Self {
        Self::from_seed(hash_seed(seed))
    }

    /// The 32-bit seed fed to the noise permutation table.
    pub fn noise_seed(&self) -> u32 {
        (self.seed ^ (self.seed >> 32)) as u32
    }
}
