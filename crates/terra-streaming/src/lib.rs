//! Terrain chunk streaming around a moving observer.
//!
//! [`TerrainStreamer`] is ticked by the host loop. When the observer crosses into a new
//! chunk it evicts out-of-range chunks, then restarts a single cancellable background
//! job that generates missing chunks nearest-first. Finished chunks are handed back
//! through a concurrent queue and materialized at most one per tick.

mod chunk;
mod coord;
mod events;
mod job;
mod order;
mod source;
mod streamer;

pub use chunk::TerrainChunk;
pub use coord::ChunkCoord;
pub use events::{ChunkEvent, ChunkEventHub};
pub use job::CancellationToken;
pub use order::ChunkOrder;
pub use source::ChunkSource;
pub use streamer::{
    MAX_CHUNK_SIZE, StreamingConfig, StreamingError, StreamingStats, TerrainStreamer, TickOutcome,
};
