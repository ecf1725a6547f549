//! Live layer view: snapshot enumeration plus before-add notification.

use super::Feature;

/// Hook invoked on a feature before it joins the loaded set.
///
/// Hooks may mutate the feature; whatever state they leave behind is what
/// the renderer sees. `FnMut` because a hook typically captures a shadow
/// synchronizer handle it writes through.
pub type BeforeAddHook = Box<dyn FnMut(&mut Feature) + Send>;

/// A live, queryable projection of a layer's currently rendered features.
///
/// Supports the two operations the stream coordinator needs:
///
/// 1. snapshot enumeration of already-loaded features, in source order;
/// 2. registration of [`BeforeAddHook`]s that run on every later arrival
///    BEFORE it becomes visible, so no untransformed frame is ever
///    observable.
///
/// Hooks run in registration order and there is no unregister: a
/// subscription lives as long as the view session, and teardown is the
/// owning scene's concern.
pub struct FeatureLayerView {
    loaded: Vec<Feature>,
    before_add: Vec<BeforeAddHook>,
}

impl FeatureLayerView {
    /// Creates a view whose loaded set starts with `loaded`.
    pub fn with_loaded(loaded: Vec<Feature>) -> Self {
        Self {
            loaded,
            before_add: Vec::new(),
        }
    }

    /// Snapshot of the loaded features, in source order.
    pub fn loaded(&self) -> &[Feature] {
        &self.loaded
    }

    /// Mutable iteration over the loaded snapshot, in source order.
    ///
    /// Used by the draining pass to transform features in place.
    pub fn loaded_mut(&mut self) -> impl Iterator<Item = &mut Feature> {
        self.loaded.iter_mut()
    }

    /// Number of currently loaded features.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether the view holds no features yet.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Registers a hook to run on every subsequently added feature.
    pub fn on_before_add(&mut self, hook: BeforeAddHook) {
        self.before_add.push(hook);
    }

    /// Delivers a newly arrived feature.
    ///
    /// Every registered hook runs to completion before the feature is
    /// appended to the loaded set, so a reader enumerating the view never
    /// observes a half-processed arrival.
    pub fn add(&mut self, mut feature: Feature) {
        for hook in &mut self.before_add {
            hook(&mut feature);
        }
        self.loaded.push(feature);
    }
}
