//! A generated terrain chunk, keyed by its coordinate alone.

use std::hash::{Hash, Hasher};

use terra_terrain::{BiomeId, Heightfield};

use crate::coord::ChunkCoord;

/// Generated elevation and biome data for one chunk.
///
/// Equality and hashing consider only the coordinate, so two generations of the
/// same chunk compare equal.
#[derive(Clone, Debug)]
pub struct TerrainChunk {
    coord: ChunkCoord,
    heightfield: Heightfield,
}

impl TerrainChunk {
    /// Wraps a heightfield generated for `coord`.
    pub fn new(coord: ChunkCoord, heightfield: Heightfield) -> Self {
        Self { coord, heightfield }
    }

    /// The chunk's coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The full heightfield.
    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    /// Row-major elevations in `[0, 1]`.
    pub fn heights(&self) -> &[f32] {
        self.heightfield.heights()
    }

    /// Row-major biome assignment, parallel to [`TerrainChunk::heights`].
    pub fn biomes(&self) -> &[BiomeId] {
        self.heightfield.biomes()
    }
}

impl PartialEq for TerrainChunk {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for TerrainChunk {}

impl Hash for TerrainChunk {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}
