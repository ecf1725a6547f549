//! Scene wiring for the exaggeration pipeline.
//!
//! Given a loaded scene, the pipeline finds the two vector layers by title,
//! replaces their renderers with the fixed descriptions from
//! [`symbology`](crate::symbology), and attaches the stream coordinator:
//! direction markers get exaggeration only, belt lines get exaggeration
//! plus a ground-shadow layer.
//!
//! The raster side is configured separately: the collaborator hides the
//! scene's default ground layer and installs an
//! [`ExaggeratedElevationSource`](crate::source::ExaggeratedElevationSource)
//! built from the same kind of config constants carried here.

use thiserror::Error;
use tracing::info;

use crate::feature::FeatureLayer;
use crate::geometry::ExaggerationFactor;
use crate::shadow::{ShadowStyle, ShadowSynchronizer};
use crate::stream::StreamCoordinator;
use crate::symbology::{conveyor_belt_renderer, direction_marker_renderer};

/// Exaggeration applied to the raster elevation path.
pub const ELEVATION_EXAGGERATION: f64 = 300.0;

/// Exaggeration applied to vector feature geometries.
pub const LAYER_EXAGGERATION: f64 = 180.0;

/// Title of the point-like direction-marker layer.
pub const DIRECTIONS_LAYER_TITLE: &str = "XYZV_Coordinates";

/// Title of the path-like conveyor-belt layer.
pub const BELT_LAYER_TITLE: &str = "Surface_Deep";

/// Configuration surface of the pipeline.
///
/// All knobs are bound at construction; nothing here is runtime-tunable.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Factor for the raster elevation path.
    pub elevation_exaggeration: ExaggerationFactor,

    /// Factor for vector geometries (markers and belts).
    pub layer_exaggeration: ExaggerationFactor,

    /// Style of the belt shadow layer.
    pub shadow_style: ShadowStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            elevation_exaggeration: ExaggerationFactor::new(ELEVATION_EXAGGERATION)
                .expect("default elevation exaggeration is valid"),
            layer_exaggeration: ExaggerationFactor::new(LAYER_EXAGGERATION)
                .expect("default layer exaggeration is valid"),
            shadow_style: ShadowStyle::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the raster-path factor.
    pub fn with_elevation_exaggeration(mut self, factor: ExaggerationFactor) -> Self {
        self.elevation_exaggeration = factor;
        self
    }

    /// Set the vector-path factor.
    pub fn with_layer_exaggeration(mut self, factor: ExaggerationFactor) -> Self {
        self.layer_exaggeration = factor;
        self
    }

    /// Set the shadow style.
    pub fn with_shadow_style(mut self, style: ShadowStyle) -> Self {
        self.shadow_style = style;
        self
    }
}

/// Errors raised while wiring a scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// A required layer is missing from the scene.
    #[error("layer \"{0}\" not found in scene")]
    LayerNotFound(String),
}

/// The vector layers of a loaded scene, looked up by title.
pub struct Scene {
    layers: Vec<FeatureLayer>,
}

impl Scene {
    /// Creates a scene over its vector layers.
    pub fn new(layers: Vec<FeatureLayer>) -> Self {
        Self { layers }
    }

    /// The scene's layers.
    pub fn layers(&self) -> &[FeatureLayer] {
        &self.layers
    }

    /// Finds a layer by title.
    pub fn layer(&self, title: &str) -> Result<&FeatureLayer, PipelineError> {
        self.layers
            .iter()
            .find(|layer| layer.title() == title)
            .ok_or_else(|| PipelineError::LayerNotFound(title.to_string()))
    }

    /// Finds a layer by title, mutably.
    pub fn layer_mut(&mut self, title: &str) -> Result<&mut FeatureLayer, PipelineError> {
        self.layers
            .iter_mut()
            .find(|layer| layer.title() == title)
            .ok_or_else(|| PipelineError::LayerNotFound(title.to_string()))
    }
}

/// Configures the direction-marker layer: popups off, inverted-cone
/// renderer installed (one cone per class break, colors carried over),
/// exaggeration attached with NO shadow synchronizer.
pub async fn configure_direction_markers(layer: &mut FeatureLayer, config: &PipelineConfig) {
    layer.load().await;
    layer.set_popup_enabled(false);

    let replacement = direction_marker_renderer(layer.renderer());
    layer.set_renderer(replacement);

    StreamCoordinator::attach(layer.view_mut(), config.layer_exaggeration, None);
    info!(layer = layer.title(), "direction markers configured");
}

/// Configures the belt layer: popups off, tube renderer installed (one
/// tube per unique value, colors carried over), exaggeration plus shadow
/// synchronization attached.
///
/// Returns the synchronizer; its layer handle is what the scene renders as
/// the ground-projection effect.
pub async fn configure_conveyor_belts(
    layer: &mut FeatureLayer,
    config: &PipelineConfig,
) -> ShadowSynchronizer {
    layer.load().await;
    layer.set_popup_enabled(false);

    let replacement = conveyor_belt_renderer(layer.renderer());
    layer.set_renderer(replacement);

    let sync = ShadowSynchronizer::new(config.shadow_style.clone());
    StreamCoordinator::attach(
        layer.view_mut(),
        config.layer_exaggeration,
        Some(sync.clone()),
    );
    info!(layer = layer.title(), "conveyor belts configured");
    sync
}

/// Wires the whole vector side of a scene.
///
/// Looks up both layers by their well-known titles, configures each, and
/// returns the belt shadow synchronizer.
pub async fn configure_scene(
    scene: &mut Scene,
    config: &PipelineConfig,
) -> Result<ShadowSynchronizer, PipelineError> {
    let belts = scene.layer_mut(BELT_LAYER_TITLE)?;
    let sync = configure_conveyor_belts(belts, config).await;

    let markers = scene.layer_mut(DIRECTIONS_LAYER_TITLE)?;
    configure_direction_markers(markers, config).await;

    Ok(sync)
}
