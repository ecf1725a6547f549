//! Elevation tile data model.
//!
//! Tiles are rectangular grids of elevation samples addressed by
//! (level, row, col) in a pyramid scheme. The types here enforce the one
//! structural invariant of the raster path: a tile's sample sequence always
//! holds exactly `width × height` values, row-major.

mod types;

pub use types::{ElevationTile, TileError, TileKey};
