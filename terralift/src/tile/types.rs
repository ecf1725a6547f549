//! Tile addressing, the sample grid, and raster-path errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pyramid address of an elevation tile.
///
/// # Example
///
/// ```
/// use terralift::tile::TileKey;
///
/// let key = TileKey::new(4, 2, 1);
/// assert_eq!(key.level(), 4);
/// assert_eq!(key.row(), 2);
/// assert_eq!(key.col(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileKey {
    /// Pyramid level (0 = coarsest).
    level: u8,
    /// Tile row within the level.
    row: u32,
    /// Tile column within the level.
    col: u32,
}

impl TileKey {
    /// Creates a new tile key.
    pub fn new(level: u8, row: u32, col: u32) -> Self {
        Self { level, row, col }
    }

    /// Pyramid level.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Tile row.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Tile column.
    pub fn col(&self) -> u32 {
        self.col
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.row, self.col)
    }
}

/// A dense grid of elevation samples for one tile.
///
/// Samples are stored row-major, one per pixel. The constructor is the only
/// way to build a tile, so `samples.len() == width × height` holds for every
/// live instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationTile {
    key: TileKey,
    width: u32,
    height: u32,
    samples: Vec<f64>,
}

impl ElevationTile {
    /// Creates a tile, validating the sample count against the declared
    /// dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::MalformedTile`] when the count does not match.
    /// A mismatched tile is never truncated or padded into shape.
    pub fn new(
        key: TileKey,
        width: u32,
        height: u32,
        samples: Vec<f64>,
    ) -> Result<Self, TileError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(TileError::MalformedTile {
                key,
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            key,
            width,
            height,
            samples,
        })
    }

    /// The tile's pyramid address.
    pub fn key(&self) -> TileKey {
        self.key
    }

    /// Tile width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Tile height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The elevation samples, row-major.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

/// Errors on the raster elevation path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileError {
    /// The upstream source failed to resolve a tile or the service itself.
    /// Propagated unchanged; this crate adds no retry on top.
    #[error("upstream elevation source failure: {0}")]
    Upstream(String),

    /// The declared dimensions disagree with the delivered sample count.
    #[error(
        "malformed tile {key}: declared {width}x{height} ({expected} samples) \
         but payload carries {actual}"
    )]
    MalformedTile {
        key: TileKey,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The wire payload is too short to hold even the tile header, or its
    /// sample section is not a whole number of samples.
    #[error("truncated payload for tile {key}: {len} bytes")]
    TruncatedPayload { key: TileKey, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_accessors() {
        let key = TileKey::new(12, 100_000, 125_184);
        assert_eq!(key.level(), 12);
        assert_eq!(key.row(), 100_000);
        assert_eq!(key.col(), 125_184);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(TileKey::new(4, 2, 1).to_string(), "4/2/1");
    }

    #[test]
    fn test_tile_valid_sample_count() {
        let tile = ElevationTile::new(TileKey::new(4, 2, 1), 2, 2, vec![10.0, 20.0, 30.0, 40.0]);
        assert!(tile.is_ok());
        let tile = tile.unwrap();
        assert_eq!(tile.width(), 2);
        assert_eq!(tile.height(), 2);
        assert_eq!(tile.samples(), &[10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_tile_rejects_mismatched_sample_count() {
        // Declared 4x4 but only 15 samples supplied
        let result = ElevationTile::new(TileKey::new(4, 2, 1), 4, 4, vec![0.0; 15]);
        match result {
            Err(TileError::MalformedTile {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("expected MalformedTile, got {:?}", other),
        }
    }

    #[test]
    fn test_tile_rejects_excess_samples() {
        let result = ElevationTile::new(TileKey::new(0, 0, 0), 2, 2, vec![0.0; 5]);
        assert!(matches!(result, Err(TileError::MalformedTile { .. })));
    }

    #[test]
    fn test_zero_sized_tile_is_valid() {
        let tile = ElevationTile::new(TileKey::new(0, 0, 0), 0, 0, Vec::new());
        assert!(tile.is_ok());
    }

    #[test]
    fn test_error_display_mentions_dimensions() {
        let err = ElevationTile::new(TileKey::new(4, 2, 1), 4, 4, vec![0.0; 15]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("4x4"));
        assert!(message.contains("15"));
    }
}
