//! Biome profile: a named bundle of height-synthesis parameters pinned to one climate corner.

use serde::{Deserialize, Serialize};

/// Temperature axis of the classification grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperature {
    /// Low end of the temperature field (index 0).
    Cold,
    /// High end of the temperature field (index 1).
    Hot,
}

/// Rainfall axis of the classification grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rainfall {
    /// Low end of the rainfall field (index 0).
    Dry,
    /// High end of the rainfall field (index 1).
    Wet,
}

/// One of the four corners of the temperature/rainfall grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeCorner {
    /// Temperature side.
    pub temperature: Temperature,
    /// Rainfall side.
    pub rainfall: Rainfall,
}

impl BiomeCorner {
    /// All four corners in table order: `(cold, dry)`, `(cold, wet)`, `(hot, dry)`, `(hot, wet)`.
    pub const ALL: [BiomeCorner; 4] = [
        BiomeCorner::new(Temperature::Cold, Rainfall::Dry),
        BiomeCorner::new(Temperature::Cold, Rainfall::Wet),
        BiomeCorner::new(Temperature::Hot, Rainfall::Dry),
        BiomeCorner::new(Temperature::Hot, Rainfall::Wet),
    ];

    /// Creates a corner from its two sides.
    pub const fn new(temperature: Temperature, rainfall: Rainfall) -> Self {
        Self {
            temperature,
            rainfall,
        }
    }

    /// Picks the corner nearest to a climate sample by rounding each axis to 0 or 1.
    ///
    /// Values exactly at `0.5` round up to the hot/wet side.
    pub fn nearest(temperature: f64, rainfall: f64) -> Self {
        let temperature = if temperature.round() >= 1.0 {
            Temperature::Hot
        } else {
            Temperature::Cold
        };
        let rainfall = if rainfall.round() >= 1.0 {
            Rainfall::Wet
        } else {
            Rainfall::Dry
        };
        Self::new(temperature, rainfall)
    }

    /// Position of this corner in [`BiomeCorner::ALL`].
    pub const fn index(self) -> usize {
        let t = match self.temperature {
            Temperature::Cold => 0,
            Temperature::Hot => 1,
        };
        let r = match self.rainfall {
            Rainfall::Dry => 0,
            Rainfall::Wet => 1,
        };
        t * 2 + r
    }
}

impl std::fmt::Display for BiomeCorner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let t = match self.temperature {
            Temperature::Cold => "cold",
            Temperature::Hot => "hot",
        };
        let r = match self.rainfall {
            Rainfall::Dry => "dry",
            Rainfall::Wet => "wet",
        };
        write!(f, "{t}/{r}")
    }
}

/// Parameters for the fractal height accumulation of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Horizontal stretch applied to chunk-normalized coordinates.
    pub scale: f64,
    /// Number of height octaves.
    pub octaves: u32,
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Amplitude of the first octave, in normalized elevation units.
    pub amplitude: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            scale: 20.0,
            octaves: 4,
            frequency: 0.02,
            amplitude: 0.1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Full descriptor for a biome type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeProfile {
    /// Human-readable biome name (e.g., "plains").
    pub name: String,
    /// Climate corner this biome occupies.
    pub corner: BiomeCorner,
    /// Surface texture layer used by materialization.
    pub layer_index: u16,
    /// Height synthesis parameters at the biome's interior.
    pub params: TerrainParams,
}

/// The stock set of four biomes, one per climate corner.
pub fn default_biome_profiles() -> Vec<BiomeProfile> {
    vec![
        BiomeProfile {
            name: "plains".into(),
            corner: BiomeCorner::new(Temperature::Cold, Rainfall::Dry),
            layer_index: 0,
            params: TerrainParams {
                scale: 20.0,
                octaves: 4,
                frequency: 0.02,
                amplitude: 0.08,
                persistence: 0.5,
                lacunarity: 2.0,
            },
        },
        BiomeProfile {
            name: "forest".into(),
            corner: BiomeCorner::new(Temperature::Cold, Rainfall::Wet),
            layer_index: 1,
            params: TerrainParams {
                scale: 25.0,
                octaves: 4,
                frequency: 0.025,
                amplitude: 0.15,
                persistence: 0.5,
                lacunarity: 2.0,
            },
        },
        BiomeProfile {
            name: "desert".into(),
            corner: BiomeCorner::new(Temperature::Hot, Rainfall::Dry),
            layer_index: 2,
            params: TerrainParams {
                scale: 15.0,
                octaves: 3,
                frequency: 0.015,
                amplitude: 0.1,
                persistence: 0.45,
                lacunarity: 2.0,
            },
        },
        BiomeProfile {
            name: "highlands".into(),
            corner: BiomeCorner::new(Temperature::Hot, Rainfall::Wet),
            layer_index: 3,
            params: TerrainParams {
                scale: 30.0,
                octaves: 6,
                frequency: 0.03,
                amplitude: 0.4,
                persistence: 0.55,
                lacunarity: 2.1,
            },
        },
    ]
}
