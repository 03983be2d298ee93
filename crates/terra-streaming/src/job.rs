//! The single cancellable background generation job.
//!
//! A job walks the planned order around one center, skips chunks that were loaded when
//! it was started, and pushes each finished chunk onto the completion queue. It checks
//! its cancellation token after generating each chunk and again after pushing it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use rustc_hash::FxHashSet;
use terra_terrain::GenerationError;

use crate::chunk::TerrainChunk;
use crate::coord::ChunkCoord;
use crate::order::ChunkOrder;
use crate::source::ChunkSource;

/// Cooperative cancellation flag shared between the scheduler and one worker.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The worker notices at its next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Counters the worker updates for the scheduler's stats.
#[derive(Debug, Default)]
pub(crate) struct JobCounters {
    pub(crate) generated: AtomicU64,
    pub(crate) faults: AtomicU64,
}

/// Everything a worker needs, moved onto its thread.
pub(crate) struct JobPlan<S> {
    pub(crate) id: u64,
    pub(crate) center: ChunkCoord,
    pub(crate) order: ChunkOrder,
    pub(crate) loaded: FxHashSet<ChunkCoord>,
    pub(crate) source: Arc<S>,
    pub(crate) completed: Sender<TerrainChunk>,
    pub(crate) token: CancellationToken,
    pub(crate) counters: Arc<JobCounters>,
}

/// How a job's walk ended.
#[derive(Debug, PartialEq, Eq)]
enum JobExit {
    Completed { produced: usize },
    Cancelled { produced: usize },
}

/// Handle to a running worker owned by the scheduler.
#[derive(Debug)]
pub(crate) struct GenerationJob {
    id: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl GenerationJob {
    /// Start the worker thread.
    pub(crate) fn spawn<S: ChunkSource>(plan: JobPlan<S>) -> std::io::Result<Self> {
        let id = plan.id;
        let token = plan.token.clone();
        let handle = std::thread::Builder::new()
            .name("terrain-gen".into())
            .spawn(move || run_worker(plan))?;
        Ok(Self { id, token, handle })
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Request cancellation without waiting for the worker to exit.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the worker thread has returned.
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

fn run_worker<S: ChunkSource>(plan: JobPlan<S>) {
    let id = plan.id;
    let center = plan.center;
    let counters = Arc::clone(&plan.counters);

    match panic::catch_unwind(AssertUnwindSafe(|| walk(&plan))) {
        Ok(Ok(JobExit::Completed { produced })) => {
            tracing::debug!(job = id, %center, produced, "terrain generation job completed");
        }
        Ok(Ok(JobExit::Cancelled { produced })) => {
            tracing::debug!(job = id, %center, produced, "terrain generation job cancelled");
        }
        Ok(Err(err)) => {
            counters.faults.fetch_add(1, Ordering::Relaxed);
            tracing::error!(job = id, %center, error = %err, "terrain generation job aborted");
        }
        Err(payload) => {
            counters.faults.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                job = id,
                %center,
                panic = panic_message(payload.as_ref()),
                "terrain generation job panicked"
            );
        }
    }
}

fn walk<S: ChunkSource>(plan: &JobPlan<S>) -> Result<JobExit, GenerationError> {
    let chunk_size = plan.order.chunk_size();
    let mut produced = 0;

    for coord in plan.order.around(plan.center) {
        if plan.loaded.contains(&coord) {
            continue;
        }

        let heightfield = plan.source.generate(coord, chunk_size)?;
        plan.counters.generated.fetch_add(1, Ordering::Relaxed);

        if plan.token.is_cancelled() {
            return Ok(JobExit::Cancelled { produced });
        }

        // Only fails once the streamer, which owns the receiver, has been dropped.
        if plan
            .completed
            .send(TerrainChunk::new(coord, heightfield))
            .is_err()
        {
            return Ok(JobExit::Cancelled { produced });
        }
        produced += 1;

        if plan.token.is_cancelled() {
            return Ok(JobExit::Cancelled { produced });
        }
    }

    Ok(JobExit::Completed { produced })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
