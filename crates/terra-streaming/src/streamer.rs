//! Tick-driven chunk streaming around a moving observer.
//!
//! The streamer owns the loaded set, the completion queue and the one live generation
//! job. Everything except chunk generation happens on the thread that calls
//! [`TerrainStreamer::tick`].

use std::sync::Arc;
use std::sync::atomic::Ordering;

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::DVec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::chunk::TerrainChunk;
use crate::coord::ChunkCoord;
use crate::events::{ChunkEvent, ChunkEventHub};
use crate::job::{CancellationToken, GenerationJob, JobCounters, JobPlan};
use crate::order::ChunkOrder;
use crate::source::ChunkSource;

/// Largest accepted chunk edge length, in world units.
pub const MAX_CHUNK_SIZE: u32 = 1 << 16;

/// Chunk geometry and view range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamingConfig {
    /// Chunk edge length in world units, in `1..=MAX_CHUNK_SIZE`.
    pub chunk_size: u32,
    /// Manhattan radius, in chunks, of the loaded area.
    pub render_distance: u32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            render_distance: 10,
        }
    }
}

impl StreamingConfig {
    /// Rejects configurations the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), StreamingError> {
        if self.chunk_size == 0 {
            return Err(StreamingError::InvalidChunkSize(self.chunk_size));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(StreamingError::ChunkSizeTooLarge(self.chunk_size));
        }
        Ok(())
    }

    /// Loaded-area radius in world units.
    pub fn range(&self) -> u64 {
        u64::from(self.chunk_size) * u64::from(self.render_distance)
    }
}

/// Errors raised when configuring a [`TerrainStreamer`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StreamingError {
    /// Chunk edge length must be at least one world unit.
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(u32),
    /// Chunk edge length exceeds [`MAX_CHUNK_SIZE`].
    #[error("chunk size must be at most {max}, got {0}", max = MAX_CHUNK_SIZE)]
    ChunkSizeTooLarge(u32),
}

/// What a single tick did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// The observer's chunk this tick.
    pub center: ChunkCoord,
    /// Whether the center changed and a new job was started.
    pub replanned: bool,
    /// Chunks evicted this tick, in coordinate order.
    pub evicted: Vec<ChunkCoord>,
    /// The chunk materialized this tick, if any.
    pub loaded: Option<ChunkCoord>,
}

/// Counters describing the scheduler's work so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Chunks currently in the loaded set.
    pub loaded: usize,
    /// Finished chunks waiting in the completion queue.
    pub queued: usize,
    /// Background jobs started.
    pub jobs_started: u64,
    /// Chunks produced by background jobs.
    pub chunks_generated: u64,
    /// Queued chunks discarded by a re-plan or reconfiguration.
    pub discarded: u64,
    /// Drained chunks dropped because the coordinate was already loaded.
    pub duplicates_dropped: u64,
    /// Drained chunks dropped because they were out of range of the current center.
    pub stale_dropped: u64,
    /// Background jobs aborted by an error or panic.
    pub generation_faults: u64,
    /// Background jobs that could not be started.
    pub spawn_failures: u64,
}

/// Streams terrain chunks in and out around an observer.
///
/// Call [`TerrainStreamer::tick`] once per host-loop step. Lifecycle notifications are
/// delivered to receivers obtained from [`TerrainStreamer::subscribe`].
pub struct TerrainStreamer<S: ChunkSource> {
    config: StreamingConfig,
    source: Arc<S>,
    order: ChunkOrder,
    loaded: FxHashMap<ChunkCoord, Arc<TerrainChunk>>,
    completed_tx: Sender<TerrainChunk>,
    completed_rx: Receiver<TerrainChunk>,
    job: Option<GenerationJob>,
    next_job_id: u64,
    center: Option<ChunkCoord>,
    events: ChunkEventHub,
    counters: Arc<JobCounters>,
    stats: StreamingStats,
}

impl<S: ChunkSource> TerrainStreamer<S> {
    /// Creates an idle streamer. Nothing is generated until the first tick.
    pub fn new(config: StreamingConfig, source: S) -> Result<Self, StreamingError> {
        Self::from_arc(config, Arc::new(source))
    }

    /// Like [`TerrainStreamer::new`] for a source shared with other owners.
    pub fn from_arc(config: StreamingConfig, source: Arc<S>) -> Result<Self, StreamingError> {
        config.validate()?;
        let (completed_tx, completed_rx) = unbounded();
        let order = ChunkOrder::plan(config.chunk_size, config.render_distance);

        tracing::info!(
            chunk_size = config.chunk_size,
            render_distance = config.render_distance,
            planned = order.len(),
            "terrain streamer created"
        );

        Ok(Self {
            config,
            source,
            order,
            loaded: FxHashMap::default(),
            completed_tx,
            completed_rx,
            job: None,
            next_job_id: 0,
            center: None,
            events: ChunkEventHub::new(),
            counters: Arc::new(JobCounters::default()),
            stats: StreamingStats::default(),
        })
    }

    /// Registers a lifecycle event subscriber.
    pub fn subscribe(&mut self) -> Receiver<ChunkEvent> {
        self.events.subscribe()
    }

    /// Advances the scheduler by one step for an observer at `position`.
    ///
    /// Re-plans if the observer entered a different chunk, then materializes at most
    /// one finished chunk.
    pub fn tick(&mut self, position: DVec3) -> TickOutcome {
        let center = ChunkCoord::containing(position, self.config.chunk_size);

        let replanned = self.center != Some(center);
        let evicted = if replanned {
            self.replan(center)
        } else {
            Vec::new()
        };

        let loaded = self.drain_one();

        TickOutcome {
            center,
            replanned,
            evicted,
            loaded,
        }
    }

    fn replan(&mut self, center: ChunkCoord) -> Vec<ChunkCoord> {
        self.retire_job();
        self.discard_queued();

        let mut evicted: Vec<ChunkCoord> = self
            .loaded
            .keys()
            .copied()
            .filter(|coord| !self.in_range(*coord, center))
            .collect();
        evicted.sort_unstable();
        for coord in &evicted {
            self.loaded.remove(coord);
            self.events.publish(ChunkEvent::Unloaded(*coord));
        }

        tracing::debug!(
            from = ?self.center,
            to = %center,
            evicted = evicted.len(),
            loaded = self.loaded.len(),
            "observer changed chunk"
        );

        self.center = Some(center);
        self.start_job(center);
        evicted
    }

    fn start_job(&mut self, center: ChunkCoord) {
        let id = self.next_job_id;
        self.next_job_id += 1;

        let plan = JobPlan {
            id,
            center,
            order: self.order.clone(),
            loaded: self.loaded.keys().copied().collect::<FxHashSet<_>>(),
            source: Arc::clone(&self.source),
            completed: self.completed_tx.clone(),
            token: CancellationToken::new(),
            counters: Arc::clone(&self.counters),
        };

        match GenerationJob::spawn(plan) {
            Ok(job) => {
                self.stats.jobs_started += 1;
                self.job = Some(job);
            }
            Err(err) => {
                self.stats.spawn_failures += 1;
                tracing::error!(
                    job = id,
                    %center,
                    error = %err,
                    "failed to spawn terrain generation worker"
                );
            }
        }
    }

    fn retire_job(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel();
            tracing::trace!(job = job.id(), "cancelled terrain generation job");
        }
    }

    fn discard_queued(&mut self) {
        let discarded = self.completed_rx.try_iter().count();
        if discarded > 0 {
            self.stats.discarded += discarded as u64;
            tracing::debug!(discarded, "cleared completion queue");
        }
    }

    fn drain_one(&mut self) -> Option<ChunkCoord> {
        let chunk = self.completed_rx.try_recv().ok()?;
        let coord = chunk.coord();

        if self.loaded.contains_key(&coord) {
            self.stats.duplicates_dropped += 1;
            return None;
        }

        // A cancelled worker may push one more chunk after the queue was cleared.
        if let Some(center) = self.center
            && !self.in_range(coord, center)
        {
            self.stats.stale_dropped += 1;
            tracing::trace!(%coord, %center, "dropped stale chunk");
            return None;
        }

        let chunk = Arc::new(chunk);
        self.loaded.insert(coord, Arc::clone(&chunk));
        self.events.publish(ChunkEvent::Loaded(chunk));
        Some(coord)
    }

    /// Applies a new configuration.
    ///
    /// Cancels the live job, discards queued chunks, unloads every loaded chunk and
    /// re-plans the order. Generation resumes on the next tick.
    pub fn reconfigure(&mut self, config: StreamingConfig) -> Result<(), StreamingError> {
        config.validate()?;

        self.retire_job();
        self.discard_queued();

        let mut unloaded: Vec<ChunkCoord> = self.loaded.drain().map(|(coord, _)| coord).collect();
        unloaded.sort_unstable();
        for coord in &unloaded {
            self.events.publish(ChunkEvent::Unloaded(*coord));
        }

        self.config = config;
        self.order = ChunkOrder::plan(config.chunk_size, config.render_distance);
        self.center = None;

        tracing::info!(
            chunk_size = config.chunk_size,
            render_distance = config.render_distance,
            unloaded = unloaded.len(),
            "terrain streamer reconfigured"
        );
        Ok(())
    }

    fn in_range(&self, coord: ChunkCoord, center: ChunkCoord) -> bool {
        coord.in_range(center, self.config.chunk_size, self.config.render_distance)
    }

    /// Whether `coord` is in the loaded set.
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded.contains_key(&coord)
    }

    /// The loaded chunk at `coord`.
    pub fn loaded_chunk(&self, coord: ChunkCoord) -> Option<&Arc<TerrainChunk>> {
        self.loaded.get(&coord)
    }

    /// All loaded coordinates, sorted.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.loaded.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Finished chunks waiting to be drained.
    pub fn queued_count(&self) -> usize {
        self.completed_rx.len()
    }

    /// The observer's chunk as of the last tick.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    pub fn config(&self) -> StreamingConfig {
        self.config
    }

    pub fn order(&self) -> &ChunkOrder {
        &self.order
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Whether the current background job is still running.
    pub fn is_generating(&self) -> bool {
        self.job.as_ref().is_some_and(|job| !job.is_finished())
    }

    /// Whether every chunk in range of the current center is loaded.
    pub fn is_settled(&self) -> bool {
        let Some(center) = self.center else {
            return false;
        };
        self.order.around(center).all(|coord| self.loaded.contains_key(&coord))
    }

    pub fn stats(&self) -> StreamingStats {
        StreamingStats {
            loaded: self.loaded.len(),
            queued: self.completed_rx.len(),
            chunks_generated: self.counters.generated.load(Ordering::Relaxed),
            generation_faults: self.counters.faults.load(Ordering::Relaxed),
            ..self.stats
        }
    }
}

impl<S: ChunkSource> Drop for TerrainStreamer<S> {
    fn drop(&mut self) {
        self.retire_job();
    }
}

impl<S: ChunkSource> std::fmt::Debug for TerrainStreamer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainStreamer")
            .field("config", &self.config)
            .field("center", &self.center)
            .field("loaded", &self.loaded.len())
            .field("queued", &self.completed_rx.len())
            .field("job", &self.job.as_ref().map(GenerationJob::id))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use terra_terrain::{BiomeId, GenerationError, Heightfield};

    struct FlatSource;

    impl ChunkSource for FlatSource {
        fn generate(&self, _: ChunkCoord, chunk_size: u32) -> Result<Heightfield, GenerationError> {
            Ok(Heightfield::filled(chunk_size, 0.25, BiomeId(1)))
        }
    }

    fn streamer(chunk_size: u32, render_distance: u32) -> TerrainStreamer<FlatSource> {
        TerrainStreamer::new(
            StreamingConfig {
                chunk_size,
                render_distance,
            },
            FlatSource,
        )
        .unwrap()
    }

    fn tick_until_settled(streamer: &mut TerrainStreamer<FlatSource>, position: DVec3) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !streamer.is_settled() && Instant::now() < deadline {
            streamer.tick(position);
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(streamer.is_settled(), "streamer did not settle: {streamer:?}");
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = StreamingConfig {
            chunk_size: 0,
            render_distance: 3,
        };
        assert_eq!(
            TerrainStreamer::new(config, FlatSource).err(),
            Some(StreamingError::InvalidChunkSize(0))
        );
    }

    #[test]
    fn test_oversized_chunk_size_rejected() {
        let config = StreamingConfig {
            chunk_size: 3_000_000_000,
            render_distance: 1,
        };
        assert_eq!(
            TerrainStreamer::new(config, FlatSource).err(),
            Some(StreamingError::ChunkSizeTooLarge(3_000_000_000))
        );

        let largest = StreamingConfig {
            chunk_size: MAX_CHUNK_SIZE,
            render_distance: 1,
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_far_observer_streams_at_world_edge() {
        let mut streamer = streamer(64, 1);
        let far = DVec3::new(3.0e9, 0.0, -3.0e9);
        let outcome = streamer.tick(far);
        assert!(outcome.replanned);
        assert!(outcome.center.x > 0 && outcome.center.z < 0);

        tick_until_settled(&mut streamer, far);
        assert_eq!(streamer.loaded_count(), 5);
        assert!(!streamer.tick(DVec3::new(4.0e9, 0.0, -4.0e9)).replanned);
    }

    #[test]
    fn test_first_tick_replans() {
        let mut streamer = streamer(16, 2);
        let outcome = streamer.tick(DVec3::ZERO);
        assert!(outcome.replanned);
        assert!(outcome.evicted.is_empty());
        assert_eq!(outcome.center, ChunkCoord::new(-8, -8));
        assert_eq!(streamer.stats().jobs_started, 1);

        let again = streamer.tick(DVec3::new(1.0, 0.0, 1.0));
        assert!(!again.replanned, "same chunk must not re-plan");
        assert_eq!(streamer.stats().jobs_started, 1);
    }

    #[test]
    fn test_at_most_one_load_per_tick() {
        let mut streamer = streamer(8, 3);
        let events = streamer.subscribe();

        let deadline = Instant::now() + Duration::from_secs(10);
        while !streamer.is_settled() && Instant::now() < deadline {
            let before = streamer.loaded_count();
            streamer.tick(DVec3::ZERO);
            assert!(streamer.loaded_count() - before <= 1);
            assert!(events.try_iter().count() <= 1);
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(streamer.loaded_count(), streamer.order().len());
    }

    #[test]
    fn test_reconfigure_unloads_everything() {
        let mut streamer = streamer(8, 1);
        tick_until_settled(&mut streamer, DVec3::ZERO);
        let events = streamer.subscribe();

        streamer
            .reconfigure(StreamingConfig {
                chunk_size: 16,
                render_distance: 2,
            })
            .unwrap();

        assert_eq!(streamer.loaded_count(), 0);
        assert_eq!(streamer.center(), None);
        assert_eq!(streamer.order().len(), 13);
        let unloaded: Vec<_> = events.try_iter().map(|e| e.coord()).collect();
        assert_eq!(unloaded.len(), 5);

        tick_until_settled(&mut streamer, DVec3::ZERO);
        assert_eq!(streamer.loaded_count(), 13);
    }

    #[test]
    fn test_reconfigure_rejects_invalid() {
        let mut streamer = streamer(8, 1);
        let err = streamer.reconfigure(StreamingConfig {
            chunk_size: 0,
            render_distance: 1,
        });
        assert!(err.is_err());
        assert_eq!(streamer.config().chunk_size, 8);
    }

    #[test]
    fn test_duplicate_completion_dropped() {
        let mut streamer = streamer(8, 0);
        tick_until_settled(&mut streamer, DVec3::ZERO);

        let coord = streamer.center().unwrap();
        streamer
            .completed_tx
            .send(TerrainChunk::new(coord, Heightfield::filled(8, 0.9, BiomeId(2))))
            .unwrap();
        assert_eq!(streamer.tick(DVec3::ZERO).loaded, None);
        assert_eq!(streamer.stats().duplicates_dropped, 1);

        let kept = streamer.loaded_chunk(coord).unwrap();
        assert_eq!(kept.heights()[0], 0.25, "original chunk data must be kept");
    }

    #[test]
    fn test_out_of_range_completion_dropped() {
        let mut streamer = streamer(8, 1);
        tick_until_settled(&mut streamer, DVec3::ZERO);

        let far = ChunkCoord::new(800, 800);
        streamer
            .completed_tx
            .send(TerrainChunk::new(far, Heightfield::filled(8, 0.5, BiomeId(0))))
            .unwrap();
        assert_eq!(streamer.tick(DVec3::ZERO).loaded, None);
        assert!(!streamer.is_loaded(far));
        assert_eq!(streamer.stats().stale_dropped, 1);
    }
}
