//! Terrain generator facade: one seeded world, callable from any thread.

use glam::IVec2;

use crate::biome::{BiomeClassifier, BiomeTable};
use crate::heightmap::{Heightfield, HeightfieldSynthesizer};
use crate::noise_field::NoiseField;
use crate::seed::GenerationContext;

/// Errors raised while synthesizing a single chunk.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Chunks must have a positive edge length.
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(u32),
    /// The height accumulation overflowed or produced NaN.
    #[error("non-finite elevation at world ({x}, {z})")]
    NonFiniteElevation {
        /// World X of the offending cell.
        x: f64,
        /// World Z of the offending cell.
        z: f64,
    },
    /// Free-form failure reported by a custom chunk source.
    #[error("chunk source failed: {0}")]
    Source(String),
}

/// Generates chunk heightfields for one world.
///
/// Holds the [`GenerationContext`] explicitly instead of any process-wide seed,
/// so several worlds can coexist.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    context: GenerationContext,
    classifier: BiomeClassifier,
    synthesizer: HeightfieldSynthesizer,
}

impl TerrainGenerator {
    /// Create a generator for `context` over a validated biome table.
    pub fn new(context: GenerationContext, table: BiomeTable) -> Self {
        let field = NoiseField::new(context.noise_seed());
        Self {
            context,
            classifier: BiomeClassifier::new(field.clone(), table),
            synthesizer: HeightfieldSynthesizer::new(field),
        }
    }

    /// Overrides the climate noise scale and octave count.
    pub fn with_climate(mut self, scale: f64, octaves: u32) -> Self {
        self.classifier = self.classifier.with_climate(scale, octaves);
        self
    }

    /// Generate the chunk whose minimum corner is at world `origin`.
    ///
    /// # Errors
    ///
    /// See [`HeightfieldSynthesizer::synthesize`].
    pub fn generate(&self, chunk_size: u32, origin: IVec2) -> Result<Heightfield, GenerationError> {
        self.synthesizer
            .synthesize(chunk_size, origin, &self.context, &self.classifier)
    }

    /// The seed-derived origins this generator uses.
    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    /// The classifier, for consumers that need per-coordinate biome queries.
    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }
}
