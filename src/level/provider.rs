//! The tile-solidity interface the collision resolver and AI consume.

use serde::{Deserialize, Serialize};

/// Collision properties of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileInfo {
    pub solid: bool,
    /// Blocks landing from above only.
    pub one_way: bool,
}

impl TileInfo {
    pub const SOLID: TileInfo = TileInfo {
        solid: true,
        one_way: false,
    };

    pub const ONE_WAY: TileInfo = TileInfo {
        solid: true,
        one_way: true,
    };
}

/// Answers "what is at this world position?".
///
/// Wraparound is the provider's business; callers pass raw world
/// coordinates.
pub trait TileProvider: Send + Sync {
    fn tile_size(&self) -> f64;

    fn tile_info_at(&self, x: f64, y: f64) -> Option<TileInfo>;

    fn is_solid_at(&self, x: f64, y: f64) -> bool {
        self.tile_info_at(x, y).is_some_and(|tile| tile.solid)
    }

    /// Solid and not one-way: blocks lateral and upward motion.
    fn is_blocking_at(&self, x: f64, y: f64) -> bool {
        self.tile_info_at(x, y)
            .is_some_and(|tile| tile.solid && !tile.one_way)
    }
}

/// A provider with nothing in it.
#[derive(Debug, Clone, Copy)]
pub struct EmptyTiles {
    pub tile_size: f64,
}

impl Default for EmptyTiles {
    fn default() -> Self {
        Self { tile_size: 16.0 }
    }
}

impl TileProvider for EmptyTiles {
    fn tile_size(&self) -> f64 {
        self.tile_size
    }

    fn tile_info_at(&self, _x: f64, _y: f64) -> Option<TileInfo> {
        None
    }
}

/// Index of the tile containing world coordinate `value`.
#[inline]
pub fn tile_coord(value: f64, tile_size: f64) -> i64 {
    (value / tile_size).floor() as i64
}
