//! Configuration for the terrain streaming world.
//!
//! Settings persist to disk as RON files, can be overridden from the command line via
//! clap, and are validated before being turned into the runtime streaming and
//! generation types.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, ObserverConfig, StreamingSection, WorldConfig,
    default_config_dir,
};
pub use error::ConfigError;
