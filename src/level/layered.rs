//! Two-layer endless world: a ground band plus a repeating sky above it.

use super::provider::{tile_coord, TileInfo, TileProvider};
use super::tilemap::TileMap;

/// Which layer a world position falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Ground,
    Sky,
}

/// Ground map anchored at `y = 0` and wrapping horizontally, with a sky
/// map tiled endlessly in both directions above it.
///
/// Everything below the ground map's bottom row is solid so bodies can
/// never fall out of the world.
#[derive(Debug, Clone)]
pub struct LayeredWorld {
    ground: Option<TileMap>,
    sky: Option<TileMap>,
    default_tile_size: f64,
}

impl Default for LayeredWorld {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl LayeredWorld {
    pub fn new(tile_size: f64) -> Self {
        Self {
            ground: None,
            sky: None,
            default_tile_size: tile_size,
        }
    }

    pub fn set_ground_map(&mut self, map: TileMap) {
        self.ground = Some(map);
    }

    pub fn set_sky_map(&mut self, map: TileMap) {
        self.sky = Some(map);
    }

    pub fn ground_map(&self) -> Option<&TileMap> {
        self.ground.as_ref()
    }

    pub fn sky_map(&self) -> Option<&TileMap> {
        self.sky.as_ref()
    }

    pub fn layer_at(&self, y: f64) -> Layer {
        if y < 0.0 {
            Layer::Sky
        } else {
            Layer::Ground
        }
    }

    /// 0 on or below the ground top, then 1, 2, ... per sky-map height climbed.
    pub fn sky_layer_index(&self, y: f64) -> u32 {
        if y >= 0.0 {
            return 0;
        }
        let sky_height = self
            .sky
            .as_ref()
            .map_or(1000.0, |sky| sky.height_px());
        ((-y) / sky_height).floor() as u32 + 1
    }

    fn ground_tile(&self, x: f64, y: f64) -> Option<TileInfo> {
        let ground = self.ground.as_ref()?;
        let size = ground.tile_size();
        let tx = tile_coord(x, size).rem_euclid(ground.width() as i64);
        let ty = tile_coord(y, size);
        if ty < 0 {
            None
        } else if ty >= ground.height() as i64 {
            Some(TileInfo::SOLID)
        } else {
            ground.get(tx, ty)
        }
    }

    fn sky_tile(&self, x: f64, y: f64) -> Option<TileInfo> {
        let sky = self.sky.as_ref()?;
        let size = sky.tile_size();
        let tx = tile_coord(x, size).rem_euclid(sky.width() as i64);
        let ty = tile_coord(y, size).rem_euclid(sky.height() as i64);
        sky.get(tx, ty)
    }
}

impl TileProvider for LayeredWorld {
    fn tile_size(&self) -> f64 {
        self.ground
            .as_ref()
            .map_or(self.default_tile_size, |ground| ground.tile_size())
    }

    fn tile_info_at(&self, x: f64, y: f64) -> Option<TileInfo> {
        match self.layer_at(y) {
            Layer::Ground => self.ground_tile(x, y),
            Layer::Sky => self.sky_tile(x, y),
        }
    }
}
