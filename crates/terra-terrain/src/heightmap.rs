//! Per-chunk fractal heightfield synthesis driven by classified biome parameters.
//!
//! Every cell is classified once; the resulting parameters drive a multi-octave
//! accumulation whose sum is remapped from `[-1, 1]` to `[0, 1]`.

use glam::{DVec2, IVec2};

use crate::biome::{BiomeClassifier, BiomeId, TerrainParams};
use crate::generator::GenerationError;
use crate::noise_field::NoiseField;
use crate::seed::GenerationContext;

/// Elevation and biome grids for one chunk, both `(chunk_size + 1)^2` cells, row-major by Z.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    resolution: usize,
    heights: Vec<f32>,
    biomes: Vec<BiomeId>,
}

impl Heightfield {
    /// A heightfield with every cell set to the same elevation and biome.
    pub fn filled(chunk_size: u32, elevation: f32, biome: BiomeId) -> Self {
        let resolution = chunk_size as usize + 1;
        Self {
            resolution,
            heights: vec![elevation; resolution * resolution],
            biomes: vec![biome; resolution * resolution],
        }
    }

    /// Number of samples along each edge (`chunk_size + 1`).
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Elevations in `[0, 1]`, row-major (`z * resolution + x`).
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Biome assignment per cell, parallel to [`Heightfield::heights`].
    pub fn biomes(&self) -> &[BiomeId] {
        &self.biomes
    }

    /// Elevation at local cell `(x, z)`, or `None` outside the grid.
    pub fn height_at(&self, x: usize, z: usize) -> Option<f32> {
        self.index(x, z).map(|i| self.heights[i])
    }

    /// Biome at local cell `(x, z)`, or `None` outside the grid.
    pub fn biome_at(&self, x: usize, z: usize) -> Option<BiomeId> {
        self.index(x, z).map(|i| self.biomes[i])
    }

    fn index(&self, x: usize, z: usize) -> Option<usize> {
        (x < self.resolution && z < self.resolution).then(|| z * self.resolution + x)
    }
}

/// Synthesizes chunk heightfields from a seeded [`NoiseField`].
#[derive(Clone, Debug)]
pub struct HeightfieldSynthesizer {
    field: NoiseField,
}

impl HeightfieldSynthesizer {
    /// Create a synthesizer sampling `field`.
    pub fn new(field: NoiseField) -> Self {
        Self { field }
    }

    /// Build the heightfield of the chunk whose minimum corner sits at `chunk_origin`.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidChunkSize`] for a zero chunk size and
    /// [`GenerationError::NonFiniteElevation`] if any cell's accumulation is not finite.
    pub fn synthesize(
        &self,
        chunk_size: u32,
        chunk_origin: IVec2,
        context: &GenerationContext,
        classifier: &BiomeClassifier,
    ) -> Result<Heightfield, GenerationError> {
        if chunk_size == 0 {
            return Err(GenerationError::InvalidChunkSize(chunk_size));
        }

        let resolution = chunk_size as usize + 1;
        let mut heights = Vec::with_capacity(resolution * resolution);
        let mut biomes = Vec::with_capacity(resolution * resolution);

        for row in 0..resolution {
            for col in 0..resolution {
                let x = f64::from(chunk_origin.x) + col as f64;
                let z = f64::from(chunk_origin.y) + row as f64;

                let class = classifier.classify(
                    x,
                    z,
                    context.temperature_origin,
                    context.rainfall_origin,
                );
                let elevation =
                    self.elevation(chunk_size, x, z, &class.params, context.terrain_origin);
                if !elevation.is_finite() {
                    return Err(GenerationError::NonFiniteElevation { x, z });
                }

                heights.push(elevation as f32);
                biomes.push(class.biome);
            }
        }

        Ok(Heightfield {
            resolution,
            heights,
            biomes,
        })
    }

    /// Elevation in `[0, 1]` at a world coordinate for the given parameters.
    ///
    /// Returns NaN if the parameters make the accumulation non-finite.
    pub fn elevation(
        &self,
        chunk_size: u32,
        x: f64,
        z: f64,
        params: &TerrainParams,
        origin: DVec2,
    ) -> f64 {
        let size = f64::from(chunk_size);
        let mut total = 0.0;
        let mut frequency = params.frequency;
        let mut amplitude = params.amplitude;

        for _ in 0..params.octaves {
            let nx = x / size * params.scale * frequency + origin.x;
            let nz = z / size * params.scale * frequency + origin.y;
            total += self.field.sample_2d(nx, nz) * amplitude;

            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        if !total.is_finite() {
            return f64::NAN;
        }
        ((total + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
