//! Terralift - vertical exaggeration and shadow synchronization for 3D map
//! scenes.
//!
//! The crate has two independent data paths sharing one definition of
//! "exaggeration" ([`geometry::exaggerate_sample`]):
//!
//! - **Raster**: [`source::ExaggeratedElevationSource`] wraps an upstream
//!   elevation source and scales every tile sample by a fixed factor as
//!   tiles are fetched.
//! - **Vector**: [`stream::StreamCoordinator`] drains a layer view's loaded
//!   features, exaggerates each geometry, and subscribes so later arrivals
//!   get the identical treatment before they become visible. Path-like
//!   streams additionally feed a [`shadow::ShadowSynchronizer`], which
//!   keeps a grow-only layer of flattened ground-shadow copies in lockstep
//!   with the processed features.
//!
//! [`pipeline`] ties the vector side together for a loaded scene and owns
//! the configuration constants.

pub mod feature;
pub mod geometry;
pub mod pipeline;
pub mod shadow;
pub mod source;
pub mod stream;
pub mod symbology;
pub mod tile;
