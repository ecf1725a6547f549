//! Shadow synchronization.
//!
//! For every path-like feature it is handed, the [`ShadowSynchronizer`]
//! derives a flattened copy — same horizontal path, z discarded to ground
//! level, attributes copied verbatim — and appends it to a grow-only
//! [`ShadowLayer`]. The layer renders every shadow with one fixed
//! translucent gray line style.
//!
//! The synchronizer performs NO deduplication: calling
//! [`on_feature`](ShadowSynchronizer::on_feature) twice for the same
//! feature produces two shadows. Exactly-once delivery is the stream
//! coordinator's contract, not a safety property enforced here.
//!
//! The collection is written through a mutex because the synchronizer is
//! cloned into before-add hooks; under the single-threaded cooperative
//! model the lock is never contended, and under a threaded runtime it
//! serializes the appends.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feature::{AttributeMap, Feature, FeatureId};
use crate::geometry::{flatten, Geometry};
use crate::symbology::{LineSymbol, Rgba};

/// Shadow line width, in pixels.
pub const SHADOW_WIDTH_PX: f64 = 12.0;

/// Shadow line color: gray at 40% opacity.
pub const SHADOW_COLOR: Rgba = [128, 128, 128, 102];

/// Fixed rendering style for the shadow layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowStyle {
    pub color: Rgba,
    pub width_px: f64,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: SHADOW_COLOR,
            width_px: SHADOW_WIDTH_PX,
        }
    }
}

impl ShadowStyle {
    /// The style as a line symbol for the layer's renderer.
    pub fn as_symbol(&self) -> LineSymbol {
        LineSymbol {
            color: self.color,
            width_px: self.width_px,
        }
    }
}

/// A flattened, ground-level duplicate of one source feature.
#[derive(Debug, Clone)]
pub struct ShadowFeature {
    source_id: FeatureId,
    geometry: Geometry,
    attributes: AttributeMap,
}

impl ShadowFeature {
    /// Identity of the feature this shadow was derived from.
    pub fn source_id(&self) -> FeatureId {
        self.source_id
    }

    /// The flattened geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The attributes copied from the source feature.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Grow-only collection of shadow features with one shared style.
///
/// There is deliberately no remove or update operation: a shadow, once
/// inserted, lives as long as the owning scene session.
#[derive(Debug, Default)]
pub struct ShadowLayer {
    style: ShadowStyle,
    features: Vec<ShadowFeature>,
}

impl ShadowLayer {
    /// Creates an empty layer with the given style.
    pub fn new(style: ShadowStyle) -> Self {
        Self {
            style,
            features: Vec::new(),
        }
    }

    /// The layer's fixed style.
    pub fn style(&self) -> &ShadowStyle {
        &self.style
    }

    /// All shadows inserted so far, in insertion order.
    pub fn features(&self) -> &[ShadowFeature] {
        &self.features
    }

    /// Number of shadows.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether no shadow has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn push(&mut self, shadow: ShadowFeature) {
        self.features.push(shadow);
    }
}

/// Derives and records shadows for processed features.
///
/// Cloning yields another handle to the same underlying layer, which is how
/// the stream coordinator moves the synchronizer into a before-add hook
/// while callers keep a handle for reading.
#[derive(Clone)]
pub struct ShadowSynchronizer {
    layer: Arc<Mutex<ShadowLayer>>,
}

impl ShadowSynchronizer {
    /// Creates a synchronizer owning a fresh, empty shadow layer.
    pub fn new(style: ShadowStyle) -> Self {
        Self {
            layer: Arc::new(Mutex::new(ShadowLayer::new(style))),
        }
    }

    /// Handle to the underlying layer, for rendering and inspection.
    pub fn layer(&self) -> Arc<Mutex<ShadowLayer>> {
        Arc::clone(&self.layer)
    }

    /// Number of shadows recorded so far.
    pub fn len(&self) -> usize {
        self.layer.lock().len()
    }

    /// Whether no shadow has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.layer.lock().is_empty()
    }

    /// Records a shadow for `feature`.
    ///
    /// Path-like features yield exactly one shadow per call, derived from
    /// the feature's CURRENT geometry (the coordinator calls this after
    /// exaggeration; flattening makes the two orderings equivalent).
    /// Point-like and geometry-less features yield none.
    pub fn on_feature(&self, feature: &Feature) {
        let Some(geometry) = feature.geometry() else {
            return;
        };
        if !matches!(geometry, Geometry::Polyline(_)) {
            return;
        }

        let shadow = ShadowFeature {
            source_id: feature.id(),
            geometry: flatten(geometry),
            attributes: feature.attributes().clone(),
        };
        let mut layer = self.layer.lock();
        layer.push(shadow);
        debug!(source = %feature.id(), shadows = layer.len(), "shadow recorded");
    }
}
