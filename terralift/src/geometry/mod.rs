//! Geometry types and the vertical exaggeration transform.
//!
//! This module is the single arithmetic definition of "exaggeration" in the
//! crate: both the raster elevation path (tile samples) and the vector path
//! (feature geometries) scale vertical values through [`exaggerate_sample`],
//! so the two pipelines can never disagree on what the factor means.
//!
//! Transforms are pure: [`exaggerate`] and [`flatten`] return new geometries
//! and never mutate their input. This avoids aliasing bugs when a feature is
//! referenced by more than one layer.

use thiserror::Error;

/// Vertical coordinate assigned to flattened (ground-projected) geometry.
pub const GROUND_LEVEL: f64 = 0.0;

/// A positive, finite scalar multiplier for vertical values.
///
/// Construction is the only validation point: once a factor exists it is
/// immutable and safe to apply. The elevation path and the vector path are
/// configured with independent factors.
///
/// # Example
///
/// ```
/// use terralift::geometry::ExaggerationFactor;
///
/// let factor = ExaggerationFactor::new(300.0).unwrap();
/// assert_eq!(factor.value(), 300.0);
/// assert!(ExaggerationFactor::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExaggerationFactor(f64);

impl ExaggerationFactor {
    /// Creates a factor, rejecting zero, negative, and non-finite values.
    pub fn new(value: f64) -> Result<Self, TransformError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(TransformError::InvalidFactor(value));
        }
        Ok(Self(value))
    }

    /// The raw multiplier.
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// A single 3D coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Creates a new coordinate.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// An ordered collection of paths, each an ordered run of coordinates.
///
/// Matches the multipath polyline shape used by the collaborating map
/// platform: a belt feature typically carries one path, but the type
/// preserves however many the source supplies, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub paths: Vec<Vec<Point3>>,
}

impl Polyline {
    /// Creates a polyline from its paths.
    pub fn new(paths: Vec<Vec<Point3>>) -> Self {
        Self { paths }
    }
}

/// Feature geometry: a single point or a multipath polyline.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point3),
    Polyline(Polyline),
}

impl Geometry {
    /// Returns an error if any coordinate component is NaN or infinite.
    ///
    /// The stream coordinator calls this before transforming so that a
    /// malformed feature is skipped rather than silently producing
    /// non-finite z values downstream.
    pub fn ensure_finite(&self) -> Result<(), TransformError> {
        let finite = |p: &Point3| p.x.is_finite() && p.y.is_finite() && p.z.is_finite();
        let ok = match self {
            Geometry::Point(p) => finite(p),
            Geometry::Polyline(line) => line.paths.iter().flatten().all(finite),
        };
        if ok {
            Ok(())
        } else {
            Err(TransformError::NonFiniteCoordinate)
        }
    }
}

impl From<Point3> for Geometry {
    fn from(point: Point3) -> Self {
        Geometry::Point(point)
    }
}

impl From<Polyline> for Geometry {
    fn from(line: Polyline) -> Self {
        Geometry::Polyline(line)
    }
}

/// Errors from the geometry transform path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The factor was zero, negative, or non-finite.
    #[error("exaggeration factor must be positive and finite, got {0}")]
    InvalidFactor(f64),

    /// The feature carries no geometry to transform.
    #[error("feature has no geometry")]
    MissingGeometry,

    /// A coordinate component was NaN or infinite.
    #[error("geometry contains a non-finite coordinate")]
    NonFiniteCoordinate,
}

/// Scales one vertical sample by the factor.
///
/// This is the shared arithmetic used by both the elevation tile path and
/// the vector geometry path. Plain floating-point multiply; no rounding and
/// no clamping. Deliberately NOT idempotent: applying it to an
/// already-scaled value compounds the factor.
#[inline]
pub fn exaggerate_sample(value: f64, factor: ExaggerationFactor) -> f64 {
    value * factor.value()
}

/// Returns a copy of `geometry` with every z multiplied by `factor`.
///
/// x and y are carried over bit-identically and path/vertex order is
/// preserved exactly. Applying with factor 1 is the identity, and applying
/// with f1 then f2 equals one application with f1 × f2.
pub fn exaggerate(geometry: &Geometry, factor: ExaggerationFactor) -> Geometry {
    map_z(geometry, |z| exaggerate_sample(z, factor))
}

/// Returns a copy of `geometry` projected onto the ground (z forced to
/// [`GROUND_LEVEL`]). Used to derive shadow geometry; x and y are untouched.
pub fn flatten(geometry: &Geometry) -> Geometry {
    map_z(geometry, |_| GROUND_LEVEL)
}

fn map_z(geometry: &Geometry, f: impl Fn(f64) -> f64) -> Geometry {
    match geometry {
        Geometry::Point(p) => Geometry::Point(Point3::new(p.x, p.y, f(p.z))),
        Geometry::Polyline(line) => Geometry::Polyline(Polyline::new(
            line.paths
                .iter()
                .map(|path| {
                    path.iter()
                        .map(|p| Point3::new(p.x, p.y, f(p.z)))
                        .collect()
                })
                .collect(),
        )),
    }
}
