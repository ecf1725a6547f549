//! Vector features and the layer interface.
//!
//! A [`Feature`] is one mapped entity: a geometry plus a bag of attributes
//! ("Azimuth", "Velocity", ...). Features belong to exactly one
//! [`FeatureLayer`]; the layer's [`FeatureLayerView`] is the live projection
//! the stream coordinator attaches to.
//!
//! These types model the collaborating map platform's layer surface as an
//! abstract typed interface: an async ready signal, a replaceable renderer,
//! and a loaded-features view with snapshot enumeration and before-add
//! notification.

mod layer_view;

pub use layer_view::{BeforeAddHook, FeatureLayerView};

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::info;

use crate::geometry::Geometry;
use crate::symbology::Renderer;

/// Attribute bag carried by every feature, keyed by field name.
pub type AttributeMap = HashMap<String, Value>;

/// Identity of a feature within its source layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single mapped entity: geometry plus attributes.
///
/// The geometry is optional because upstream sources occasionally deliver
/// attribute-only records; the stream coordinator skips those rather than
/// halting the stream.
#[derive(Debug, Clone)]
pub struct Feature {
    id: FeatureId,
    geometry: Option<Geometry>,
    attributes: AttributeMap,
}

impl Feature {
    /// Creates a feature.
    pub fn new(id: FeatureId, geometry: Option<Geometry>, attributes: AttributeMap) -> Self {
        Self {
            id,
            geometry,
            attributes,
        }
    }

    /// The feature's identity.
    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// The feature's geometry, if it has one.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Replaces the geometry with a transformed copy.
    pub fn replace_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    /// All attributes.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Looks up one attribute by field name.
    pub fn attribute(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Looks up one attribute and coerces it to a number.
    pub fn numeric_attribute(&self, field: &str) -> Option<f64> {
        self.attributes.get(field).and_then(Value::as_f64)
    }
}

/// A vector layer: metadata, renderer, and its live view.
///
/// The async [`load`](FeatureLayer::load) is the ready signal the pipeline
/// awaits before touching the renderer or attaching to the view, mirroring
/// the load/ready handshake of the collaborating platform.
pub struct FeatureLayer {
    title: String,
    popup_enabled: bool,
    renderer: Option<Renderer>,
    view: FeatureLayerView,
}

impl FeatureLayer {
    /// Creates a layer whose view starts with the given loaded features.
    pub fn new(title: impl Into<String>, loaded: Vec<Feature>) -> Self {
        Self {
            title: title.into(),
            popup_enabled: true,
            renderer: None,
            view: FeatureLayerView::with_loaded(loaded),
        }
    }

    /// The layer title, used for scene lookup.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Resolves when the layer is ready for renderer changes and view
    /// attachment.
    pub async fn load(&mut self) {
        info!(layer = %self.title, features = self.view.len(), "layer loaded");
    }

    /// Whether popups are enabled on this layer.
    pub fn popup_enabled(&self) -> bool {
        self.popup_enabled
    }

    /// Enables or disables popups.
    pub fn set_popup_enabled(&mut self, enabled: bool) {
        self.popup_enabled = enabled;
    }

    /// The current renderer, if one is installed.
    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    /// Replaces the renderer wholesale.
    pub fn set_renderer(&mut self, renderer: Renderer) {
        self.renderer = Some(renderer);
    }

    /// The layer's live view.
    pub fn view(&self) -> &FeatureLayerView {
        &self.view
    }

    /// Mutable access to the live view.
    pub fn view_mut(&mut self) -> &mut FeatureLayerView {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use serde_json::json;

    fn point_feature(id: u64, z: f64) -> Feature {
        Feature::new(
            FeatureId(id),
            Some(Geometry::Point(Point3::new(0.0, 0.0, z))),
            AttributeMap::from([("Velocity".to_string(), json!(3.5))]),
        )
    }

    #[test]
    fn test_numeric_attribute_coercion() {
        let feature = point_feature(1, 10.0);
        assert_eq!(feature.numeric_attribute("Velocity"), Some(3.5));
        assert_eq!(feature.numeric_attribute("Azimuth"), None);
    }

    #[test]
    fn test_replace_geometry() {
        let mut feature = point_feature(1, 10.0);
        feature.replace_geometry(Geometry::Point(Point3::new(0.0, 0.0, 99.0)));
        let Some(Geometry::Point(p)) = feature.geometry() else {
            panic!("expected point");
        };
        assert_eq!(p.z, 99.0);
    }

    #[tokio::test]
    async fn test_layer_defaults() {
        let mut layer = FeatureLayer::new("Surface_Deep", vec![point_feature(1, 0.0)]);
        layer.load().await;
        assert_eq!(layer.title(), "Surface_Deep");
        assert!(layer.popup_enabled());
        assert!(layer.renderer().is_none());
        assert_eq!(layer.view().len(), 1);
    }
}
