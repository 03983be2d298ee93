//! Command-line argument parsing for terra.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain streaming command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terra", about = "Seed-deterministic terrain chunk streaming")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<String>,

    /// Chunk edge length in world units.
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Render distance in chunks.
    #[arg(long)]
    pub render_distance: Option<u32>,

    /// Number of ticks to simulate.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Observer speed in world units per tick.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref seed) = args.seed {
            self.world.seed = seed.clone();
        }
        if let Some(size) = args.chunk_size {
            self.streaming.chunk_size = size;
        }
        if let Some(rd) = args.render_distance {
            self.streaming.render_distance = rd;
        }
        if let Some(ticks) = args.ticks {
            self.observer.ticks = ticks;
        }
        if let Some(speed) = args.speed {
            self.observer.speed = speed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
