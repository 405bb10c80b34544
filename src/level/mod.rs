//! Tile geometry the simulation collides against.
//!
//! The core never generates levels; it consumes a [`TileProvider`] and a
//! spawn point. [`Level::from_rows`] and [`LayeredWorld`] are the stock
//! providers.

mod error;
mod layered;
mod provider;
mod tilemap;

pub use error::LevelError;
pub use layered::{Layer, LayeredWorld};
pub use provider::{tile_coord, EmptyTiles, TileInfo, TileProvider};
pub use tilemap::{Level, TileMap};
