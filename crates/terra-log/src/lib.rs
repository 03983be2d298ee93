//! Structured logging and tracing for terra.
//!
//! Console output with uptime timestamps and thread names (the background generation
//! worker runs on a thread named `terrain-gen`), plus an optional JSON file log for
//! post-mortem analysis. The log level comes from `RUST_LOG`, then the config, then
//! [`DEFAULT_FILTER`].

use std::path::Path;

use terra_config::Config;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::{Format, Json, JsonFields};
use tracing_subscriber::fmt::time::Uptime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// The JSON file layer produced by [`json_file_layer`].
pub type JsonFileLayer<S> = fmt::Layer<S, JsonFields, Format<Json, Uptime>, std::fs::File>;

/// Filter used when neither `RUST_LOG` nor the config name a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file created inside the log directory.
pub const LOG_FILE: &str = "terra.log";

/// Initialize the global tracing subscriber.
///
/// # Arguments
///
/// * `log_dir` - Directory for the JSON log file
/// * `file_logging` - Whether to write the JSON log file at all
/// * `config` - Optional configuration to use for log level override
///
/// Failing to create the log file is not fatal; console logging still starts.
///
/// # Examples
///
/// ```no_run
/// use terra_log::init_logging;
/// use terra_config::Config;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, file_logging: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if file_logging
        && let Some(log_dir) = log_dir
        && let Ok(file_layer) = json_file_layer(log_dir)
    {
        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The filter directives for `config`, falling back to [`DEFAULT_FILTER`].
pub fn filter_directives(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// A layer writing one JSON object per event to `log_dir/terra.log`.
///
/// Creates the directory if needed and truncates an existing log file.
pub fn json_file_layer<S>(log_dir: &Path) -> std::io::Result<JsonFileLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(log_dir)?;
    let log_file = std::fs::File::create(log_dir.join(LOG_FILE))?;

    Ok(fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_timer(fmt::time::uptime())
        .json())
}
