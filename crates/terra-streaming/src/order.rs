//! Nearest-first visiting order of chunk offsets around an origin.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::coord::ChunkCoord;

/// Unit steps on the 4-connected lattice, in expansion order.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Precomputed breadth-first order of offsets within a Manhattan radius.
///
/// Computed once per configuration and translated to each new center. Cloning
/// shares the offset list.
#[derive(Clone, Debug)]
pub struct ChunkOrder {
    offsets: Arc<[ChunkCoord]>,
    chunk_size: u32,
    radius: u32,
}

impl ChunkOrder {
    /// Breadth-first traversal from the origin with step `chunk_size`, expanding to a
    /// neighbour only if unvisited and within `radius * chunk_size` Manhattan distance.
    ///
    /// Offsets past the edge of the `i32` world are not visited.
    pub fn plan(chunk_size: u32, radius: u32) -> Self {
        let step = i32::try_from(chunk_size).unwrap_or(i32::MAX);
        let origin = ChunkCoord::default();

        let mut offsets = Vec::new();
        let mut frontier = VecDeque::from([origin]);
        let mut visited = FxHashSet::default();
        visited.insert(origin);

        while let Some(current) = frontier.pop_front() {
            offsets.push(current);

            for (dx, dz) in DIRECTIONS {
                let offset = ChunkCoord::new(dx * step, dz * step);
                let Some(next) = current.checked_add(offset) else {
                    continue;
                };
                if !visited.insert(next) {
                    continue;
                }
                if !next.in_range(origin, chunk_size, radius) {
                    continue;
                }
                frontier.push_back(next);
            }
        }

        Self {
            offsets: offsets.into(),
            chunk_size,
            radius,
        }
    }

    /// The planned offsets, nearest first.
    pub fn offsets(&self) -> &[ChunkCoord] {
        &self.offsets
    }

    /// The offsets translated to `center`.
    pub fn around(&self, center: ChunkCoord) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.offsets.iter().map(move |&offset| center + offset)
    }

    /// Number of chunks in range.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` if the order is empty. A planned order always holds the origin.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Chunk edge length the order was planned for.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Radius in chunks the order was planned for.
    pub fn radius(&self) -> u32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_count(radius: u32) -> usize {
        let r = radius as usize;
        2 * r * r + 2 * r + 1
    }

    #[test]
    fn test_radius_zero_is_origin_only() {
        let order = ChunkOrder::plan(64, 0);
        assert_eq!(order.offsets(), &[ChunkCoord::default()]);
    }

    #[test]
    fn test_radius_one_visits_origin_then_neighbours() {
        let order = ChunkOrder::plan(64, 1);
        assert_eq!(
            order.offsets(),
            &[
                ChunkCoord::new(0, 0),
                ChunkCoord::new(64, 0),
                ChunkCoord::new(0, 64),
                ChunkCoord::new(-64, 0),
                ChunkCoord::new(0, -64),
            ]
        );
    }

    #[test]
    fn test_every_offset_in_range_exactly_once() {
        for size in [1u32, 7, 16, 64] {
            for radius in 0..=6u32 {
                let order = ChunkOrder::plan(size, radius);
                let unique: FxHashSet<_> = order.offsets().iter().copied().collect();
                assert_eq!(unique.len(), order.len(), "duplicates for s={size} r={radius}");
                assert_eq!(order.len(), expected_count(radius), "s={size} r={radius}");

                let step = size as i32;
                let r = radius as i32;
                for dx in -r..=r {
                    for dz in -r..=r {
                        if dx.abs() + dz.abs() <= r {
                            assert!(unique.contains(&ChunkCoord::new(dx * step, dz * step)));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_graph_distance_non_decreasing() {
        let size = 32;
        let order = ChunkOrder::plan(size, 8);
        let origin = ChunkCoord::default();
        let distances: Vec<u64> = order
            .offsets()
            .iter()
            .map(|o| o.manhattan(origin) / u64::from(size))
            .collect();
        assert!(
            distances.windows(2).all(|w| w[0] <= w[1]),
            "BFS order must be nearest-first: {distances:?}"
        );
    }

    #[test]
    fn test_around_translates_to_center() {
        let order = ChunkOrder::plan(16, 1);
        let center = ChunkCoord::new(-8, 24);
        let translated: Vec<_> = order.around(center).collect();
        assert_eq!(translated[0], center);
        assert_eq!(translated[1], ChunkCoord::new(8, 24));
        assert_eq!(translated.len(), 5);
    }

    #[test]
    fn test_oversized_step_stays_in_world() {
        let order = ChunkOrder::plan(3_000_000_000, 1);
        assert_eq!(
            order.offsets(),
            &[
                ChunkCoord::new(0, 0),
                ChunkCoord::new(i32::MAX, 0),
                ChunkCoord::new(0, i32::MAX),
                ChunkCoord::new(-i32::MAX, 0),
                ChunkCoord::new(0, -i32::MAX),
            ]
        );
    }

    #[test]
    fn test_around_saturates_near_world_edge() {
        let order = ChunkOrder::plan(64, 2);
        let edge = ChunkCoord::new(i32::MAX - 40, 0);
        let translated: Vec<_> = order.around(edge).collect();
        assert_eq!(translated.len(), order.len());
        assert!(translated.iter().all(|c| c.x >= edge.x - 128));
        assert!(translated.contains(&ChunkCoord::new(i32::MAX, 0)));
    }

    #[test]
    fn test_clone_shares_offsets() {
        let order = ChunkOrder::plan(16, 3);
        let copy = order.clone();
        assert!(std::ptr::eq(order.offsets(), copy.offsets()));
    }
}
