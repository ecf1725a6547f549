//! Stream coordination: drain the loaded snapshot, then subscribe.
//!
//! Attaching to a layer view runs two passes, in order:
//!
//! 1. **Draining** — every already-loaded feature is transformed (and
//!    shadowed, when a synchronizer is configured) in source order.
//! 2. **Subscribed** — a before-add hook applies the identical treatment to
//!    every later arrival before it becomes visible.
//!
//! The drain completes fully before the hook is registered, and the view
//! runs hooks before an arrival joins the loaded set, so the union of
//! "already present" and "arrives later" is processed exactly once each and
//! the renderer never observes an untransformed feature from an attached
//! stream.
//!
//! Per-feature failures are fail-soft: a feature with missing or malformed
//! geometry is logged, left untransformed AND unshadowed, and the stream
//! continues; the subscription itself is never torn down by an error.

use tracing::{info, warn};

use crate::feature::{Feature, FeatureLayerView};
use crate::geometry::{exaggerate, ExaggerationFactor, TransformError};
use crate::shadow::ShadowSynchronizer;

/// Attaches exaggeration (and optional shadow synchronization) to feature
/// streams.
pub struct StreamCoordinator;

impl StreamCoordinator {
    /// Attaches to `view`: transforms the loaded snapshot, then subscribes
    /// to future arrivals.
    ///
    /// Pass `None` for `shadow` on streams that should not cast shadows
    /// (point-like direction markers). There is no detach, and attaching
    /// twice to the same view is not guarded against — doing so compounds
    /// the factor, like stacking two exaggerated elevation sources.
    pub fn attach(
        view: &mut FeatureLayerView,
        factor: ExaggerationFactor,
        shadow: Option<ShadowSynchronizer>,
    ) {
        // Draining pass: the snapshot, in source order.
        let mut drained = 0usize;
        for feature in view.loaded_mut() {
            Self::process(feature, factor, shadow.as_ref());
            drained += 1;
        }
        info!(
            drained,
            factor = factor.value(),
            shadowed = shadow.is_some(),
            "stream drained, subscribing for arrivals"
        );

        // Subscribed pass: identical treatment for every later arrival.
        view.on_before_add(Box::new(move |feature: &mut Feature| {
            Self::process(feature, factor, shadow.as_ref());
        }));
    }

    /// Transform-then-shadow for one feature, fail-soft.
    fn process(
        feature: &mut Feature,
        factor: ExaggerationFactor,
        shadow: Option<&ShadowSynchronizer>,
    ) {
        match Self::transform(feature, factor) {
            Ok(()) => {
                if let Some(sync) = shadow {
                    sync.on_feature(feature);
                }
            }
            Err(error) => {
                warn!(feature = %feature.id(), %error, "skipping feature");
            }
        }
    }

    /// Replaces the feature's geometry with its exaggerated copy.
    fn transform(feature: &mut Feature, factor: ExaggerationFactor) -> Result<(), TransformError> {
        let geometry = feature.geometry().ok_or(TransformError::MissingGeometry)?;
        geometry.ensure_finite()?;
        let exaggerated = exaggerate(geometry, factor);
        feature.replace_geometry(exaggerated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{AttributeMap, FeatureId};
    use crate::geometry::{Geometry, Point3, Polyline};
    use crate::shadow::ShadowStyle;

    fn factor(value: f64) -> ExaggerationFactor {
        ExaggerationFactor::new(value).unwrap()
    }

    fn point_feature(id: u64, z: f64) -> Feature {
        Feature::new(
            FeatureId(id),
            Some(Geometry::Point(Point3::new(1.0, 2.0, z))),
            AttributeMap::new(),
        )
    }

    fn belt_feature(id: u64, z: f64) -> Feature {
        Feature::new(
            FeatureId(id),
            Some(Geometry::Polyline(Polyline::new(vec![vec![
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 1.0, z + 1.0),
            ]]))),
            AttributeMap::new(),
        )
    }

    fn point_z(feature: &Feature) -> f64 {
        let Some(Geometry::Point(p)) = feature.geometry() else {
            panic!("expected point");
        };
        p.z
    }

    #[test]
    fn test_snapshot_transformed_on_attach() {
        let mut view =
            FeatureLayerView::with_loaded(vec![point_feature(1, 50.0), point_feature(2, -10.0)]);
        StreamCoordinator::attach(&mut view, factor(300.0), None);

        assert_eq!(point_z(&view.loaded()[0]), 15_000.0);
        assert_eq!(point_z(&view.loaded()[1]), -3_000.0);
    }

    #[test]
    fn test_arrivals_transformed_after_attach() {
        let mut view = FeatureLayerView::with_loaded(Vec::new());
        StreamCoordinator::attach(&mut view, factor(180.0), None);

        view.add(point_feature(1, 2.0));
        assert_eq!(point_z(&view.loaded()[0]), 360.0);
    }

    #[test]
    fn test_shadow_completeness_across_both_passes() {
        // 3 pre-loaded + 2 late arrivals must yield exactly 5 shadows.
        let mut view = FeatureLayerView::with_loaded(vec![
            belt_feature(1, 10.0),
            belt_feature(2, 20.0),
            belt_feature(3, 30.0),
        ]);
        let sync = ShadowSynchronizer::new(ShadowStyle::default());
        StreamCoordinator::attach(&mut view, factor(180.0), Some(sync.clone()));
        assert_eq!(sync.len(), 3);

        view.add(belt_feature(4, 40.0));
        view.add(belt_feature(5, 50.0));
        assert_eq!(sync.len(), 5);

        let layer = sync.layer();
        let layer = layer.lock();
        let sources: Vec<u64> = layer.features().iter().map(|s| s.source_id().0).collect();
        assert_eq!(sources, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_no_shadow_synchronizer_means_no_shadows() {
        let mut view = FeatureLayerView::with_loaded(vec![point_feature(1, 50.0)]);
        StreamCoordinator::attach(&mut view, factor(300.0), None);
        view.add(point_feature(2, 60.0));
        // Nothing to assert on a shadow layer: none exists for this stream.
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_missing_geometry_skipped_stream_continues() {
        let mut view = FeatureLayerView::with_loaded(vec![
            Feature::new(FeatureId(1), None, AttributeMap::new()),
            belt_feature(2, 5.0),
        ]);
        let sync = ShadowSynchronizer::new(ShadowStyle::default());
        StreamCoordinator::attach(&mut view, factor(2.0), Some(sync.clone()));

        // The bad feature is unshadowed, the good one processed.
        assert_eq!(sync.len(), 1);
        assert_eq!(sync.layer().lock().features()[0].source_id(), FeatureId(2));
    }

    #[test]
    fn test_malformed_geometry_left_untransformed_subscription_survives() {
        let mut view = FeatureLayerView::with_loaded(Vec::new());
        let sync = ShadowSynchronizer::new(ShadowStyle::default());
        StreamCoordinator::attach(&mut view, factor(2.0), Some(sync.clone()));

        view.add(point_feature(1, f64::NAN));
        view.add(belt_feature(2, 7.0));

        // The NaN feature kept its original geometry and cast no shadow,
        // and the later arrival was still processed.
        assert!(point_z(&view.loaded()[0]).is_nan());
        assert_eq!(sync.len(), 1);

        let Some(Geometry::Polyline(line)) = view.loaded()[1].geometry() else {
            panic!("expected polyline");
        };
        assert_eq!(line.paths[0][0].z, 14.0);
    }
}
