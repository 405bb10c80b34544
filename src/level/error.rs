//! Error types for building tile levels.

use thiserror::Error;

/// Errors that can occur when turning level data into a tile map.
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    /// No rows, or only empty rows.
    #[error("Level map is empty")]
    EmptyMap,

    /// Rows must all be the same width.
    #[error("Row {row} has width {actual}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Glyph not in the tile legend.
    #[error("Unknown tile '{glyph}' at position ({x}, {y})")]
    UnknownTile { glyph: char, x: usize, y: usize },

    /// The map has no spawn marker.
    #[error("Level map has no spawn point")]
    MissingSpawn,

    /// Tile size must be finite and positive.
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(f64),
}
