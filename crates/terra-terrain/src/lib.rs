//! Procedural terrain generation: domain-warped climate noise, biome classification
//! with continuous parameter blending, and per-chunk fractal heightfield synthesis.

mod generator;
mod heightmap;
mod noise_field;
mod seed;

pub mod biome;

pub use biome::{
    BLEND_HIGH, BLEND_LOW, BiomeClassifier, BiomeCorner, BiomeId, BiomeProfile, BiomeTable,
    BiomeTableError, Classification, ClimateSample, Rainfall, Temperature, TerrainParams,
    abrupt_lerp, default_biome_profiles,
};
pub use generator::{GenerationError, TerrainGenerator};
pub use heightmap::{Heightfield, HeightfieldSynthesizer};
pub use noise_field::{NoiseField, WARP_STRENGTH};
pub use seed::{GenerationContext, ORIGIN_RANGE, hash_seed};
