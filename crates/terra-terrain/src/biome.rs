//! Biome system: corner profiles, the 2x2 climate table, and noise-driven classification.
//!
//! Two warped climate fields (temperature and rainfall) select the nearest corner of a
//! fixed 2x2 table for biome identity, while the generation parameters are blended
//! continuously across narrow bands around each axis midpoint.

mod classifier;
mod profile;
mod table;

pub use classifier::{
    BLEND_HIGH, BLEND_LOW, BiomeClassifier, Classification, ClimateSample, abrupt_lerp,
};
pub use profile::{
    BiomeCorner, BiomeProfile, Rainfall, Temperature, TerrainParams, default_biome_profiles,
};
pub use table::{BiomeId, BiomeTable, BiomeTableError};
