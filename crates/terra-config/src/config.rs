//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terra_streaming::{MAX_CHUNK_SIZE, StreamingConfig};
use terra_terrain::{
    BiomeClassifier, BiomeProfile, BiomeTable, GenerationContext, TerrainGenerator,
    default_biome_profiles,
};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Platform config directory for terra, e.g. `~/.config/terra` on Linux.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("terra")
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Chunk geometry and view range.
    pub streaming: StreamingSection,
    /// Seed and climate noise settings.
    pub world: WorldConfig,
    /// One profile per climate corner.
    pub biomes: Vec<BiomeProfile>,
    /// Simulated observer walk.
    pub observer: ObserverConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Chunk streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingSection {
    /// Chunk edge length in world units.
    pub chunk_size: u32,
    /// Render distance in chunks (Manhattan).
    pub render_distance: u32,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. Any string; hashed to an integer.
    pub seed: String,
    /// Base scale of the temperature and rainfall noise.
    pub climate_scale: f64,
    /// Octave count of the temperature and rainfall noise.
    pub climate_octaves: u32,
}

/// Observer walk used by the demo binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    /// Distance travelled per tick in world units.
    pub speed: f64,
    /// Walking direction on the X/Z plane, degrees from +X towards +Z.
    pub heading_degrees: f64,
    /// Number of ticks to simulate.
    pub ticks: u32,
    /// Tick rate in Hz (0 = as fast as possible).
    pub tick_rate_hz: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            streaming: StreamingSection::default(),
            world: WorldConfig::default(),
            biomes: default_biome_profiles(),
            observer: ObserverConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for StreamingSection {
    fn default() -> Self {
        let streaming = StreamingConfig::default();
        Self {
            chunk_size: streaming.chunk_size,
            render_distance: streaming.render_distance,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: "Azeroth".to_string(),
            climate_scale: BiomeClassifier::DEFAULT_CLIMATE_SCALE,
            climate_octaves: BiomeClassifier::DEFAULT_CLIMATE_OCTAVES,
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            heading_degrees: 30.0,
            ticks: 600,
            tick_rate_hz: 60,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation / conversion ---

impl Config {
    /// Checks every setting and builds the biome table.
    ///
    /// Nothing is defaulted here: an invalid value is an error.
    pub fn validate(&self) -> Result<BiomeTable, ConfigError> {
        if self.streaming.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "streaming.chunk_size must be positive".into(),
            ));
        }
        if self.streaming.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "streaming.chunk_size must be at most {MAX_CHUNK_SIZE}, got {}",
                self.streaming.chunk_size
            )));
        }
        if !(self.world.climate_scale.is_finite() && self.world.climate_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world.climate_scale must be a positive number, got {}",
                self.world.climate_scale
            )));
        }
        if self.world.climate_octaves == 0 {
            return Err(ConfigError::Invalid(
                "world.climate_octaves must be positive".into(),
            ));
        }
        if !(self.observer.speed.is_finite() && self.observer.speed >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "observer.speed must be a non-negative number, got {}",
                self.observer.speed
            )));
        }
        if !self.observer.heading_degrees.is_finite() {
            return Err(ConfigError::Invalid(
                "observer.heading_degrees must be finite".into(),
            ));
        }

        Ok(BiomeTable::new(self.biomes.iter().cloned())?)
    }

    /// Runtime streaming settings.
    pub fn streaming_config(&self) -> StreamingConfig {
        StreamingConfig {
            chunk_size: self.streaming.chunk_size,
            render_distance: self.streaming.render_distance,
        }
    }

    /// Builds the terrain generator for the configured seed, climate and biomes.
    pub fn generator(&self) -> Result<TerrainGenerator, ConfigError> {
        let table = self.validate()?;
        let context = GenerationContext::from_seed_str(&self.world.seed);
        Ok(TerrainGenerator::new(context, table)
            .with_climate(self.world.climate_scale, self.world.climate_octaves))
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_terrain::{BiomeTableError, Rainfall, Temperature};

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(ron_str.contains("chunk_size: 64"));
        assert!(ron_str.contains("seed: \"Azeroth\""));
        assert!(ron_str.contains("\"highlands\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(streaming: (chunk_size: 32), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.streaming.chunk_size, 32);
        assert_eq!(config.streaming.render_distance, 10);
        assert_eq!(config.world, WorldConfig::default());
        assert_eq!(config.biomes.len(), 4);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        let table = config.validate().unwrap();
        assert_eq!(table.iter().count(), 4);
        assert_eq!(
            config.streaming_config(),
            StreamingConfig {
                chunk_size: 64,
                render_distance: 10
            }
        );
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = Config::default();
        config.streaming.chunk_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(config.generator().is_err());
    }

    #[test]
    fn test_oversized_chunk_size_rejected() {
        let mut config = Config::default();
        config.streaming.chunk_size = 3_000_000_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("streaming.chunk_size"), "{err}");

        config.streaming.chunk_size = MAX_CHUNK_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_render_distance_allowed() {
        let mut config = Config::default();
        config.streaming.render_distance = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_climate_rejected() {
        let mut config = Config::default();
        config.world.climate_scale = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.world.climate_scale = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.world.climate_octaves = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_biome_is_error() {
        let mut config = Config::default();
        config.biomes.retain(|b| b.name != "desert");
        match config.validate() {
            Err(ConfigError::Biomes(BiomeTableError::MissingCorner(corner))) => {
                assert_eq!(corner.temperature, Temperature::Hot);
                assert_eq!(corner.rainfall, Rainfall::Dry);
            }
            other => panic!("expected missing corner error, got {other:?}"),
        }
    }

    #[test]
    fn test_generator_uses_seed() {
        let config = Config::default();
        let generator = config.generator().unwrap();
        assert_eq!(
            *generator.context(),
            GenerationContext::from_seed_str("Azeroth")
        );
        assert_eq!(generator.classifier().climate_scale, 1000.0);
        assert_eq!(generator.classifier().climate_octaves, 4);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = "Draenor".to_string();
        config.streaming.render_distance = 4;
        config.biomes[0].params.amplitude = 0.3;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.streaming.chunk_size = 128;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().streaming.chunk_size, 128);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
