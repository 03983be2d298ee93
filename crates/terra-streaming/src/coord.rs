//! Chunk coordinates on the X/Z plane.

use std::ops::Add;

use glam::{DVec3, IVec2};

/// Identifies a chunk by the integer world position of its minimum corner.
///
/// Coordinates are in world units, so neighbouring chunks differ by the chunk size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// World X of the chunk's minimum corner.
    pub x: i32,
    /// World Z of the chunk's minimum corner.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing a world position.
    ///
    /// Chunks are recentred by half a chunk, so the observer sits near the middle of
    /// the chunk it is in rather than at a corner. Positions beyond the `i32` world map
    /// to the outermost chunk whose corners are still representable.
    pub fn containing(position: DVec3, chunk_size: u32) -> Self {
        let size = i64::from(chunk_size.max(1));
        let half = size / 2;
        let limit = (i64::from(i32::MAX) / size - 1).max(0);

        let corner = |p: f64| {
            let index = ((p / size as f64 + 0.5).floor() as i64).clamp(-limit, limit);
            (index * size - half) as i32
        };
        Self {
            x: corner(position.x),
            z: corner(position.z),
        }
    }

    /// Manhattan distance in world units.
    pub fn manhattan(self, other: ChunkCoord) -> u64 {
        (i64::from(self.x) - i64::from(other.x)).unsigned_abs()
            + (i64::from(self.z) - i64::from(other.z)).unsigned_abs()
    }

    /// Whether this chunk lies within `radius` chunks (Manhattan) of `center`.
    pub fn in_range(self, center: ChunkCoord, chunk_size: u32, radius: u32) -> bool {
        self.manhattan(center) <= u64::from(radius) * u64::from(chunk_size)
    }

    /// Component-wise sum, or `None` past the edge of the `i32` world.
    pub fn checked_add(self, rhs: ChunkCoord) -> Option<Self> {
        Some(Self::new(self.x.checked_add(rhs.x)?, self.z.checked_add(rhs.z)?))
    }

    /// The minimum corner as a world-space integer vector `(x, z)`.
    pub fn origin(self) -> IVec2 {
        IVec2::new(self.x, self.z)
    }
}

impl Add for ChunkCoord {
    type Output = Self;

    /// Saturates at the edge of the `i32` world.
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.z.saturating_add(rhs.z))
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
