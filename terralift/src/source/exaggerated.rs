//! Exaggerating elevation source wrapper.
//!
//! Wraps any [`ElevationSource`] and returns tiles whose samples are scaled
//! by a fixed exaggeration factor. Composition keeps the wrapper behind the
//! same `{load, fetch_tile}` interface as the delegate, so the renderer
//! cannot tell the two apart.

use tracing::info;

use super::http::AsyncHttpClient;
use super::remote::HttpElevationSource;
use super::ElevationSource;
use crate::geometry::{exaggerate_sample, ExaggerationFactor};
use crate::tile::{ElevationTile, TileError, TileKey};

/// Default exaggeration applied when no factor is configured.
pub const DEFAULT_ELEVATION_EXAGGERATION: f64 = 10.0;

/// Default world elevation service.
pub const DEFAULT_ELEVATION_URL: &str =
    "https://elevation3d.arcgis.com/arcgis/rest/services/WorldElevation3D/Terrain3D/ImageServer";

/// Configuration for an exaggerated elevation source.
///
/// An explicit struct rather than a dynamic property bag: both knobs are
/// bound once at construction and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ExaggeratedSourceConfig {
    /// Root URL of the upstream elevation service.
    pub url: String,

    /// Factor applied to every sample of every fetched tile.
    pub exaggeration: ExaggerationFactor,
}

impl Default for ExaggeratedSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ELEVATION_URL.to_string(),
            exaggeration: ExaggerationFactor::new(DEFAULT_ELEVATION_EXAGGERATION)
                .expect("default exaggeration is valid"),
        }
    }
}

impl ExaggeratedSourceConfig {
    /// Set the upstream service URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the exaggeration factor.
    pub fn with_exaggeration(mut self, exaggeration: ExaggerationFactor) -> Self {
        self.exaggeration = exaggeration;
        self
    }
}

/// Elevation source that scales every delivered sample by a fixed factor.
///
/// The transform is a pure per-call copy: the delegate's tile is consumed
/// and a new tile with identical dimensions and scaled samples is returned,
/// order preserved, nothing clamped. Upstream failures pass through
/// unchanged.
///
/// # Not Idempotent
///
/// Fetching through two stacked wrappers compounds their factors; wrapping
/// an already-exaggerated source is a caller error this type does not
/// detect.
pub struct ExaggeratedElevationSource<S: ElevationSource> {
    inner: S,
    exaggeration: ExaggerationFactor,
}

impl<S: ElevationSource> ExaggeratedElevationSource<S> {
    /// Wraps `inner`, scaling its tiles by `exaggeration`.
    pub fn new(inner: S, exaggeration: ExaggerationFactor) -> Self {
        Self {
            inner,
            exaggeration,
        }
    }

    /// The configured factor.
    pub fn exaggeration(&self) -> ExaggerationFactor {
        self.exaggeration
    }
}

impl<C: AsyncHttpClient> ExaggeratedElevationSource<HttpElevationSource<C>> {
    /// Builds the standard stack: an HTTP source wrapped by the
    /// exaggerating delegate, from one config.
    pub fn from_config(config: ExaggeratedSourceConfig, http_client: C) -> Self {
        let inner = HttpElevationSource::new(http_client, config.url);
        Self::new(inner, config.exaggeration)
    }
}

impl<S: ElevationSource> ElevationSource for ExaggeratedElevationSource<S> {
    async fn load(&self) -> Result<(), TileError> {
        // Ready only once the delegate is ready.
        self.inner.load().await?;
        info!(
            exaggeration = self.exaggeration.value(),
            "exaggerated elevation source ready"
        );
        Ok(())
    }

    async fn fetch_tile(&self, key: TileKey) -> Result<ElevationTile, TileError> {
        let tile = self.inner.fetch_tile(key).await?;
        let samples = tile
            .samples()
            .iter()
            .map(|&sample| exaggerate_sample(sample, self.exaggeration))
            .collect();
        ElevationTile::new(key, tile.width(), tile.height(), samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockAsyncHttpClient;

    /// In-memory delegate returning a canned result.
    struct StaticSource {
        result: Result<ElevationTile, TileError>,
    }

    impl ElevationSource for StaticSource {
        async fn load(&self) -> Result<(), TileError> {
            self.result.as_ref().map(|_| ()).map_err(|e| e.clone())
        }

        async fn fetch_tile(&self, _key: TileKey) -> Result<ElevationTile, TileError> {
            self.result.clone()
        }
    }

    fn factor(value: f64) -> ExaggerationFactor {
        ExaggerationFactor::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_samples_scaled_in_order() {
        let key = TileKey::new(4, 2, 1);
        let inner = StaticSource {
            result: ElevationTile::new(key, 2, 2, vec![10.0, 20.0, 30.0, 40.0]),
        };
        let source = ExaggeratedElevationSource::new(inner, factor(100.0));

        let tile = source.fetch_tile(key).await.unwrap();
        assert_eq!(tile.samples(), &[1000.0, 2000.0, 3000.0, 4000.0]);
        assert_eq!(tile.width(), 2);
        assert_eq!(tile.height(), 2);
        assert_eq!(tile.key(), key);
    }

    #[tokio::test]
    async fn test_negative_samples_scaled_not_clamped() {
        let key = TileKey::new(0, 0, 0);
        let inner = StaticSource {
            result: ElevationTile::new(key, 3, 1, vec![-420.5, 0.0, 8848.0]),
        };
        let source = ExaggeratedElevationSource::new(inner, factor(2.0));

        let tile = source.fetch_tile(key).await.unwrap();
        assert_eq!(tile.samples(), &[-841.0, 0.0, 17696.0]);
    }

    #[tokio::test]
    async fn test_upstream_failure_passes_through() {
        let inner = StaticSource {
            result: Err(TileError::Upstream("HTTP 503".to_string())),
        };
        let source = ExaggeratedElevationSource::new(inner, factor(100.0));

        let result = source.fetch_tile(TileKey::new(1, 0, 0)).await;
        match result {
            Err(TileError::Upstream(message)) => assert!(message.contains("503")),
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stacked_wrappers_compound() {
        // Wrapping twice is a caller error the type does not guard against;
        // the observable behavior is a compounded factor.
        let key = TileKey::new(2, 1, 1);
        let inner = StaticSource {
            result: ElevationTile::new(key, 1, 1, vec![5.0]),
        };
        let stacked = ExaggeratedElevationSource::new(
            ExaggeratedElevationSource::new(inner, factor(10.0)),
            factor(3.0),
        );

        let tile = stacked.fetch_tile(key).await.unwrap();
        assert_eq!(tile.samples(), &[150.0]);
    }

    #[tokio::test]
    async fn test_from_config_builds_http_stack() {
        // 1x1 tile payload with a single 5.0 sample
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.extend_from_slice(&5.0f32.to_le_bytes());

        let config = ExaggeratedSourceConfig::default()
            .with_url("https://elevation.example.com")
            .with_exaggeration(factor(4.0));
        let source = ExaggeratedElevationSource::from_config(
            config,
            MockAsyncHttpClient {
                response: Ok(payload),
            },
        );

        let tile = source.fetch_tile(TileKey::new(0, 0, 0)).await.unwrap();
        assert_eq!(tile.samples(), &[20.0]);
    }

    #[test]
    fn test_config_defaults_and_builders() {
        let config = ExaggeratedSourceConfig::default();
        assert_eq!(config.url, DEFAULT_ELEVATION_URL);
        assert_eq!(config.exaggeration.value(), DEFAULT_ELEVATION_EXAGGERATION);

        let config = config
            .with_url("https://elevation.example.com")
            .with_exaggeration(factor(300.0));
        assert_eq!(config.url, "https://elevation.example.com");
        assert_eq!(config.exaggeration.value(), 300.0);
    }
}
