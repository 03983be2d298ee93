//! The seam between the scheduler and whatever produces chunk data.

use terra_terrain::{GenerationError, Heightfield, TerrainGenerator};

use crate::coord::ChunkCoord;

/// Produces the heightfield for a chunk. Called from the background worker thread.
pub trait ChunkSource: Send + Sync + 'static {
    /// Generate the chunk at `coord` with edge length `chunk_size`.
    ///
    /// # Errors
    ///
    /// Any error aborts the current background job; the chunk is retried on the next
    /// re-plan.
    fn generate(&self, coord: ChunkCoord, chunk_size: u32)
    -> Result<Heightfield, GenerationError>;
}

impl ChunkSource for TerrainGenerator {
    fn generate(
        &self,
        coord: ChunkCoord,
        chunk_size: u32,
    ) -> Result<Heightfield, GenerationError> {
        TerrainGenerator::generate(self, chunk_size, coord.origin())
    }
}
