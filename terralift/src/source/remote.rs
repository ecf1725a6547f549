//! HTTP-backed elevation source.
//!
//! Fetches raw elevation tiles from an ImageServer-style endpoint and
//! decodes the sample grid the service delivers.
//!
//! # URL Pattern
//!
//! `{base}/tile/{level}/{row}/{col}`
//!
//! # Payload Format
//!
//! The service delivers a tile as a little-endian binary grid:
//!
//! | Offset | Size | Field                         |
//! |--------|------|-------------------------------|
//! | 0      | 4    | width in pixels (u32)         |
//! | 4      | 4    | height in pixels (u32)        |
//! | 8      | 4×N  | N = width × height f32 samples, row-major |
//!
//! A payload whose declared dimensions disagree with the number of samples
//! actually present is surfaced as [`TileError::MalformedTile`]; it is never
//! truncated or padded into shape.

use bytes::Buf;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::ElevationSource;
use crate::tile::{ElevationTile, TileError, TileKey};

/// Byte length of the width/height header.
const HEADER_LEN: usize = 8;

/// Byte length of one encoded sample.
const SAMPLE_LEN: usize = 4;

/// Elevation source backed by an HTTP tile service.
pub struct HttpElevationSource<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: AsyncHttpClient> HttpElevationSource<C> {
    /// Creates a source for the service rooted at `base_url`.
    pub fn new(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Builds the tile URL for the given key.
    fn build_url(&self, key: TileKey) -> String {
        format!(
            "{}/tile/{}/{}/{}",
            self.base_url,
            key.level(),
            key.row(),
            key.col()
        )
    }

    /// Decodes a raw service payload into an [`ElevationTile`].
    fn decode_tile(key: TileKey, payload: &[u8]) -> Result<ElevationTile, TileError> {
        if payload.len() < HEADER_LEN {
            return Err(TileError::TruncatedPayload {
                key,
                len: payload.len(),
            });
        }

        let mut buf = payload;
        let width = buf.get_u32_le();
        let height = buf.get_u32_le();

        if buf.remaining() % SAMPLE_LEN != 0 {
            return Err(TileError::TruncatedPayload {
                key,
                len: payload.len(),
            });
        }

        let mut samples = Vec::with_capacity(buf.remaining() / SAMPLE_LEN);
        while buf.has_remaining() {
            samples.push(buf.get_f32_le() as f64);
        }

        // Sample-count validation lives in the tile constructor
        ElevationTile::new(key, width, height, samples)
    }
}

impl<C: AsyncHttpClient> ElevationSource for HttpElevationSource<C> {
    async fn load(&self) -> Result<(), TileError> {
        // Probe the service root so a dead endpoint fails at load time
        // rather than on the first tile of the session.
        self.http_client.get(&self.base_url).await?;
        debug!(url = %self.base_url, "elevation source ready");
        Ok(())
    }

    async fn fetch_tile(&self, key: TileKey) -> Result<ElevationTile, TileError> {
        let url = self.build_url(key);
        let payload = self.http_client.get(&url).await?;
        let tile = Self::decode_tile(key, &payload)?;
        debug!(
            tile = %key,
            width = tile.width(),
            height = tile.height(),
            "fetched elevation tile"
        );
        Ok(tile)
    }
}
