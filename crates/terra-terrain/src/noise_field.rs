//! Seeded noise primitives shared by climate classification and height synthesis.
//!
//! All functions are pure: the same seed and coordinates always give the same value,
//! and a [`NoiseField`] can be sampled from any number of threads at once.

use glam::DVec2;
use noise::{NoiseFn, Simplex};

/// Displacement multiplier applied to the first fractal sample when domain-warping.
pub const WARP_STRENGTH: f64 = 80.0;

/// Fixed shift of the displacement sample so it decorrelates from the final sample.
const WARP_SHIFT: DVec2 = DVec2::new(5.3, 0.8);

/// Deterministic 2D gradient noise with fractal and domain-warped variants.
pub struct NoiseField {
    noise: Simplex,
    seed: u32,
}

impl NoiseField {
    /// Create a noise field for the given integer seed.
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Simplex::new(seed),
            seed,
        }
    }

    /// The integer seed this field was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the base gradient noise. Always in `[-1, 1]`.
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Layered noise remapped to `[0, 1]`.
    ///
    /// Each octave divides the coordinate by a scale that doubles per octave and is
    /// weighted by the inverse of an opacity that also doubles, so the first octave
    /// dominates. The weighted sum is normalized by the total weight before remapping.
    /// Zero octaves yield the midpoint `0.5`.
    pub fn fractal(&self, x: f64, y: f64, octaves: u32, origin: DVec2, base_scale: f64) -> f64 {
        let mut total = 0.0;
        let mut weight_sum = 0.0;
        let mut scale = base_scale;
        let mut opacity = 1.0;

        for _ in 0..octaves {
            let value = self.sample_2d(x / scale + origin.x, y / scale + origin.y);
            total += value / opacity;
            weight_sum += 1.0 / opacity;

            scale *= 2.0;
            opacity *= 2.0;
        }

        if weight_sum == 0.0 {
            return 0.5;
        }

        ((total / weight_sum + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Domain-warped fractal noise in `[0, 1]`.
    ///
    /// A first fractal evaluation `q` displaces both coordinates by
    /// [`WARP_STRENGTH`]` * q` before the final evaluation, bending otherwise
    /// axis-aligned contours.
    pub fn warped(&self, x: f64, y: f64, octaves: u32, origin: DVec2, base_scale: f64) -> f64 {
        let q = self.fractal(
            x + WARP_SHIFT.x,
            y + WARP_SHIFT.y,
            octaves,
            origin,
            base_scale,
        );

        self.fractal(
            x + WARP_STRENGTH * q,
            y + WARP_STRENGTH * q,
            octaves,
            origin,
            base_scale,
        )
    }
}

impl Clone for NoiseField {
    fn clone(&self) -> Self {
        Self::new(self.seed)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}
