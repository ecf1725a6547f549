//! Elevation source abstraction.
//!
//! An [`ElevationSource`] is anything that can asynchronously signal
//! readiness and resolve elevation tiles by (level, row, col). The concrete
//! implementations here are:
//!
//! - [`HttpElevationSource`] — fetches raw tiles from an elevation service
//!   over HTTP and decodes the sample grid.
//! - [`ExaggeratedElevationSource`] — wraps any other source and scales
//!   every delivered sample by a fixed exaggeration factor.
//!
//! The wrapper composes rather than subclasses: the renderer consumes it
//! through the same two-method interface as the source it delegates to.
//!
//! # Example
//!
//! ```ignore
//! use terralift::source::{
//!     AsyncReqwestClient, ElevationSource, ExaggeratedElevationSource,
//!     ExaggeratedSourceConfig, HttpElevationSource,
//! };
//!
//! let config = ExaggeratedSourceConfig::default();
//! let client = AsyncReqwestClient::new()?;
//! let inner = HttpElevationSource::new(client, config.url.clone());
//! let source = ExaggeratedElevationSource::new(inner, config.exaggeration);
//! source.load().await?;
//! let tile = source.fetch_tile(key).await?;
//! ```

mod exaggerated;
mod http;
mod remote;

pub use exaggerated::{
    ExaggeratedElevationSource, ExaggeratedSourceConfig, DEFAULT_ELEVATION_EXAGGERATION,
    DEFAULT_ELEVATION_URL,
};
pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use remote::HttpElevationSource;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

use crate::tile::{ElevationTile, TileError, TileKey};

/// Asynchronous elevation source: a ready signal plus per-tile fetch.
///
/// Implementations must not block the caller; both operations suspend until
/// the underlying service resolves.
pub trait ElevationSource: Send + Sync {
    /// Resolves when the source is ready to serve tiles.
    ///
    /// Called once before the first fetch, mirroring the load/ready
    /// handshake of the collaborating map platform.
    fn load(&self) -> impl std::future::Future<Output = Result<(), TileError>> + Send;

    /// Fetches the tile at `key`.
    ///
    /// Upstream failures propagate unchanged; this trait implies no retry
    /// policy of its own.
    fn fetch_tile(
        &self,
        key: TileKey,
    ) -> impl std::future::Future<Output = Result<ElevationTile, TileError>> + Send;
}
