//! A downstream consumer of chunk lifecycle events.
//!
//! Stands in for mesh and collision building: keeps a small summary per loaded chunk
//! and releases it when the chunk is unloaded.

use rustc_hash::FxHashMap;
use terra_streaming::{ChunkCoord, ChunkEvent, TerrainChunk};
use terra_terrain::BiomeId;

/// What the demo keeps for each materialized chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkSummary {
    pub mean_height: f32,
    pub peak_height: f32,
    /// Biome at the chunk's centre cell.
    pub centre_biome: BiomeId,
    /// Surface texture layer of the centre biome.
    pub surface_layer: u16,
}

impl ChunkSummary {
    fn of(chunk: &TerrainChunk, surface_layers: &[u16; 4]) -> Self {
        let heights = chunk.heights();
        let sum: f32 = heights.iter().sum();
        let peak = heights.iter().copied().fold(f32::MIN, f32::max);
        let field = chunk.heightfield();
        let mid = field.resolution() / 2;
        let centre_biome = field.biome_at(mid, mid).unwrap_or(BiomeId(0));

        Self {
            mean_height: sum / heights.len() as f32,
            peak_height: peak,
            centre_biome,
            surface_layer: surface_layers
                .get(usize::from(centre_biome.0))
                .copied()
                .unwrap_or_default(),
        }
    }
}

/// Materialized state mirrored from lifecycle events.
#[derive(Debug)]
pub struct WorldView {
    surface_layers: [u16; 4],
    chunks: FxHashMap<ChunkCoord, ChunkSummary>,
    loads: u64,
    unloads: u64,
}

impl WorldView {
    /// An empty view texturing chunks with `surface_layers`, indexed by [`BiomeId`].
    pub fn new(surface_layers: [u16; 4]) -> Self {
        Self {
            surface_layers,
            chunks: FxHashMap::default(),
            loads: 0,
            unloads: 0,
        }
    }

    /// Applies one event.
    pub fn apply(&mut self, event: &ChunkEvent) {
        match event {
            ChunkEvent::Loaded(chunk) => {
                let summary = ChunkSummary::of(chunk, &self.surface_layers);
                tracing::trace!(
                    coord = %chunk.coord(),
                    mean = summary.mean_height,
                    biome = summary.centre_biome.0,
                    layer = summary.surface_layer,
                    "materialized chunk"
                );
                self.chunks.insert(chunk.coord(), summary);
                self.loads += 1;
            }
            ChunkEvent::Unloaded(coord) => {
                if self.chunks.remove(coord).is_none() {
                    tracing::warn!(%coord, "unload for a chunk that was never materialized");
                }
                self.unloads += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkSummary> {
        self.chunks.get(&coord)
    }

    pub fn loads(&self) -> u64 {
        self.loads
    }

    pub fn unloads(&self) -> u64 {
        self.unloads
    }

    /// Number of materialized chunks per centre biome, indexed by [`BiomeId`].
    pub fn biome_histogram(&self) -> [usize; 4] {
        let mut histogram = [0; 4];
        for summary in self.chunks.values() {
            if let Some(slot) = histogram.get_mut(usize::from(summary.centre_biome.0)) {
                *slot += 1;
            }
        }
        histogram
    }

    /// Distinct surface layers in use, sorted.
    pub fn surface_layers_in_use(&self) -> Vec<u16> {
        let mut layers: Vec<u16> = self.chunks.values().map(|s| s.surface_layer).collect();
        layers.sort_unstable();
        layers.dedup();
        layers
    }

    /// Highest peak among materialized chunks.
    pub fn highest_peak(&self) -> Option<(ChunkCoord, f32)> {
        self.chunks
            .iter()
            .map(|(coord, summary)| (*coord, summary.peak_height))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
