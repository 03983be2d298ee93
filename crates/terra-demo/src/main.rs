//! Demo binary that streams terrain around a walking observer.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p terra-demo -- --seed Azeroth --render-distance 4`.

mod walk;
mod world_view;

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use terra_config::{CliArgs, Config, default_config_dir};
use terra_streaming::TerrainStreamer;
use tracing::info;

use walk::ObserverWalk;
use world_view::WorldView;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    terra_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let generator = match config.generator() {
        Ok(generator) => generator,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let surface_layers = generator.classifier().table().surface_layers();
    let mut streamer = match TerrainStreamer::new(config.streaming_config(), generator) {
        Ok(streamer) => streamer,
        Err(e) => {
            tracing::error!(error = %e, "invalid streaming configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        seed = %config.world.seed,
        chunk_size = config.streaming.chunk_size,
        render_distance = config.streaming.render_distance,
        ticks = config.observer.ticks,
        "streaming terrain"
    );

    run(&config, &mut streamer, surface_layers);
    ExitCode::SUCCESS
}

fn run<S: terra_streaming::ChunkSource>(
    config: &Config,
    streamer: &mut TerrainStreamer<S>,
    surface_layers: [u16; 4],
) {
    let events = streamer.subscribe();
    let mut view = WorldView::new(surface_layers);
    let mut walk = ObserverWalk::new(&config.observer);

    let tick_interval = match config.observer.tick_rate_hz {
        0 => Duration::ZERO,
        hz => Duration::from_secs_f64(1.0 / f64::from(hz)),
    };
    let started = Instant::now();

    for tick in 0..config.observer.ticks {
        let tick_start = Instant::now();
        let position = walk.advance();
        let outcome = streamer.tick(position);

        for event in events.try_iter() {
            view.apply(&event);
        }

        if outcome.replanned {
            info!(
                tick,
                center = %outcome.center,
                evicted = outcome.evicted.len(),
                materialized = view.len(),
                "observer entered chunk"
            );
        }

        if let Some(remaining) = tick_interval.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    let stats = streamer.stats();
    let [cold_dry, cold_wet, hot_dry, hot_wet] = view.biome_histogram();
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        position = ?walk.position(),
        loaded = stats.loaded,
        queued = stats.queued,
        jobs = stats.jobs_started,
        generated = stats.chunks_generated,
        discarded = stats.discarded,
        duplicates = stats.duplicates_dropped,
        stale = stats.stale_dropped,
        faults = stats.generation_faults,
        "streaming finished"
    );
    info!(
        loads = view.loads(),
        unloads = view.unloads(),
        cold_dry,
        cold_wet,
        hot_dry,
        hot_wet,
        layers = ?view.surface_layers_in_use(),
        "materialized chunks by centre biome"
    );
    if let Some((coord, peak)) = view.highest_peak() {
        info!(%coord, peak, "highest loaded peak");
    }
}
