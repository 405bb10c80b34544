//! Fixed-size tile grids and the ASCII level format.

use bevy::math::DVec2;

use super::error::LevelError;
use super::provider::{tile_coord, TileInfo, TileProvider};

/// A rectangular grid of tiles.
///
/// Coordinates outside the grid wrap on the axes flagged in `wrap_x` /
/// `wrap_y` and read as empty otherwise.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: usize,
    height: usize,
    tile_size: f64,
    tiles: Vec<Option<TileInfo>>,
    pub wrap_x: bool,
    pub wrap_y: bool,
}

impl TileMap {
    pub fn new(width: usize, height: usize, tile_size: f64) -> Result<Self, LevelError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(LevelError::InvalidTileSize(tile_size));
        }
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyMap);
        }
        Ok(Self {
            width,
            height,
            tile_size,
            tiles: vec![None; width * height],
            wrap_x: false,
            wrap_y: false,
        })
    }

    #[must_use]
    pub fn with_wrap(mut self, wrap_x: bool, wrap_y: bool) -> Self {
        self.wrap_x = wrap_x;
        self.wrap_y = wrap_y;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width_px(&self) -> f64 {
        self.width as f64 * self.tile_size
    }

    pub fn height_px(&self) -> f64 {
        self.height as f64 * self.tile_size
    }

    /// Maps tile coordinates into the grid, applying wraparound.
    fn normalize(&self, tx: i64, ty: i64) -> Option<(usize, usize)> {
        let x = wrap_axis(tx, self.width, self.wrap_x)?;
        let y = wrap_axis(ty, self.height, self.wrap_y)?;
        Some((x, y))
    }

    pub fn get(&self, tx: i64, ty: i64) -> Option<TileInfo> {
        let (x, y) = self.normalize(tx, ty)?;
        self.tiles[y * self.width + x]
    }

    /// Writes a tile. Out-of-range coordinates (after wrapping) are ignored.
    pub fn set(&mut self, tx: i64, ty: i64, tile: Option<TileInfo>) {
        if let Some((x, y)) = self.normalize(tx, ty) {
            self.tiles[y * self.width + x] = tile;
        }
    }

    pub fn fill_row(&mut self, ty: i64, tile: TileInfo) {
        for tx in 0..self.width as i64 {
            self.set(tx, ty, Some(tile));
        }
    }

    /// Topmost solid row in a column, if any.
    pub fn surface_row(&self, tx: i64) -> Option<usize> {
        (0..self.height).find(|&ty| self.get(tx, ty as i64).is_some_and(|t| t.solid))
    }
}

fn wrap_axis(value: i64, len: usize, wrap: bool) -> Option<usize> {
    let len = len as i64;
    if wrap {
        Some(value.rem_euclid(len) as usize)
    } else if (0..len).contains(&value) {
        Some(value as usize)
    } else {
        None
    }
}

impl TileProvider for TileMap {
    fn tile_size(&self) -> f64 {
        self.tile_size
    }

    fn tile_info_at(&self, x: f64, y: f64) -> Option<TileInfo> {
        self.get(tile_coord(x, self.tile_size), tile_coord(y, self.tile_size))
    }
}

/// A tile map plus the points marked in its source rows.
#[derive(Debug, Clone)]
pub struct Level {
    pub map: TileMap,
    /// World position of the `P` marker tile's top-left corner.
    pub spawn: DVec2,
    /// World positions of `E` marker tiles.
    pub enemy_spawns: Vec<DVec2>,
}

impl Level {
    /// Parses ASCII rows, top row first.
    ///
    /// Legend: `#` solid, `=` one-way platform, `.` or space empty,
    /// `P` player spawn, `E` enemy spawn.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f64) -> Result<Self, LevelError> {
        let rows: Vec<&str> = rows.iter().map(|row| row.as_ref()).collect();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut map = TileMap::new(width, rows.len(), tile_size)?;
        let mut spawn = None;
        let mut enemy_spawns = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(LevelError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let corner = DVec2::new(x as f64 * tile_size, y as f64 * tile_size);
                let tile = match glyph {
                    '#' => Some(TileInfo::SOLID),
                    '=' => Some(TileInfo::ONE_WAY),
                    '.' | ' ' => None,
                    'P' => {
                        spawn = Some(corner);
                        None
                    }
                    'E' => {
                        enemy_spawns.push(corner);
                        None
                    }
                    glyph => return Err(LevelError::UnknownTile { glyph, x, y }),
                };
                map.set(x as i64, y as i64, tile);
            }
        }

        let spawn = spawn.ok_or(LevelError::MissingSpawn)?;
        Ok(Self {
            map,
            spawn,
            enemy_spawns,
        })
    }
}
