//! Fixed symbol and visual-variable descriptions.
//!
//! The pipeline replaces each source layer's classification renderer
//! wholesale: direction markers become inverted-cone object symbols rotated
//! by the "Azimuth" field and sized from the "Velocity" field, belt lines
//! become tube (path) symbols, and the shadow layer gets a single
//! translucent gray line. The classification itself survives the
//! replacement: each class break keeps its own color, carried from the
//! symbol the layer arrived with.

use crate::feature::Feature;

/// RGBA color, 0-255 per channel.
pub type Rgba = [u8; 4];

/// Color used when a source layer arrives without a renderer to borrow
/// colors from.
pub const DEFAULT_SYMBOL_COLOR: Rgba = [200, 200, 200, 255];

/// Direction-marker cone width, in scene units.
pub const MARKER_WIDTH: f64 = 200_000.0;

/// Direction-marker cone depth, in scene units.
pub const MARKER_DEPTH: f64 = 200_000.0;

/// Direction-marker cone height, in scene units.
pub const MARKER_HEIGHT: f64 = 400_000.0;

/// Tilt applied to the marker cone so it lies along its heading.
pub const MARKER_TILT_DEG: f64 = 90.0;

/// Tube radius used for belt features, in scene units.
pub const TUBE_SIZE: f64 = 100_000.0;

/// Baseline of the velocity-driven height expression.
pub const SIZE_BASELINE: f64 = 400_000.0;

/// Scene units of marker height added per unit of velocity.
pub const SIZE_PER_VELOCITY: f64 = 100_000.0;

/// Attribute field driving marker rotation.
pub const ROTATION_FIELD: &str = "Azimuth";

/// Attribute field driving marker height.
pub const VELOCITY_FIELD: &str = "Velocity";

/// Inverted-cone object symbol for point-like direction markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMarkerSymbol {
    pub color: Rgba,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub tilt_deg: f64,
}

impl ObjectMarkerSymbol {
    /// The standard inverted-cone marker in the given color.
    pub fn inverted_cone(color: Rgba) -> Self {
        Self {
            color,
            width: MARKER_WIDTH,
            depth: MARKER_DEPTH,
            height: MARKER_HEIGHT,
            tilt_deg: MARKER_TILT_DEG,
        }
    }
}

/// Tube (path) symbol for belt polylines.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeSymbol {
    pub color: Rgba,
    pub size: f64,
}

impl TubeSymbol {
    /// The standard belt tube in the given color.
    pub fn standard(color: Rgba) -> Self {
        Self {
            color,
            size: TUBE_SIZE,
        }
    }
}

/// Flat line symbol, used by the shadow layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSymbol {
    pub color: Rgba,
    pub width_px: f64,
}

/// Any symbol the pipeline installs.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Marker(ObjectMarkerSymbol),
    Tube(TubeSymbol),
    Line(LineSymbol),
}

impl Symbol {
    /// The symbol's color, for carrying over into a replacement renderer.
    pub fn color(&self) -> Rgba {
        match self {
            Symbol::Marker(s) => s.color,
            Symbol::Tube(s) => s.color,
            Symbol::Line(s) => s.color,
        }
    }
}

/// One classification bucket of a renderer.
///
/// Covers both shapes the platform delivers: a class-break info (value
/// range) and a unique-value info. The pipeline only ever reads and
/// replaces the symbol, so the bucket's matching criteria are not modeled.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub symbol: Symbol,
}

impl ClassInfo {
    /// Creates a bucket rendered with `symbol`.
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }
}

/// Axis a size visual variable applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeAxis {
    Height,
    WidthAndDepth,
}

/// Axis a rotation visual variable applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    Heading,
}

/// Per-feature size computation.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeExpression {
    /// Fixed size for every feature.
    Constant(f64),

    /// `baseline + coefficient × feature.attribute(field)`.
    ///
    /// A feature missing the field contributes zero to the linear term, so
    /// it renders at the baseline size rather than being dropped.
    Linear {
        baseline: f64,
        coefficient: f64,
        field: String,
    },
}

impl SizeExpression {
    /// Evaluates the expression for one feature.
    pub fn evaluate(&self, feature: &Feature) -> f64 {
        match self {
            SizeExpression::Constant(size) => *size,
            SizeExpression::Linear {
                baseline,
                coefficient,
                field,
            } => baseline + coefficient * feature.numeric_attribute(field).unwrap_or(0.0),
        }
    }
}

/// Data-driven overrides layered on the symbols.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualVariable {
    /// Rotate the symbol by an attribute field.
    Rotation { field: String, axis: RotationAxis },

    /// Size one axis of the symbol from an expression.
    Size {
        axis: SizeAxis,
        expression: SizeExpression,
    },
}

/// A complete renderer description: classification buckets plus the visual
/// variables shared by all of them.
///
/// A renderer with a single bucket is the platform's "simple" renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    pub classes: Vec<ClassInfo>,
    pub visual_variables: Vec<VisualVariable>,
}

impl Renderer {
    /// A simple renderer: one bucket, no visual variables.
    pub fn simple(symbol: Symbol) -> Self {
        Self {
            classes: vec![ClassInfo::new(symbol)],
            visual_variables: Vec::new(),
        }
    }

    /// The color of each classification bucket, in order.
    pub fn class_colors(&self) -> Vec<Rgba> {
        self.classes.iter().map(|c| c.symbol.color()).collect()
    }
}

/// One color per bucket of the renderer being replaced, or the default
/// when the layer arrived with no renderer (or an empty classification).
fn carried_colors(source: Option<&Renderer>) -> Vec<Rgba> {
    match source {
        Some(renderer) if !renderer.classes.is_empty() => renderer.class_colors(),
        _ => vec![DEFAULT_SYMBOL_COLOR],
    }
}

/// Replacement renderer for the direction-marker layer.
///
/// Every class break keeps its color but renders as an inverted cone
/// rotated to the feature's azimuth, height driven by velocity
/// (`400000 + 100000 × velocity`), footprint held constant.
pub fn direction_marker_renderer(source: Option<&Renderer>) -> Renderer {
    Renderer {
        classes: carried_colors(source)
            .into_iter()
            .map(|color| ClassInfo::new(Symbol::Marker(ObjectMarkerSymbol::inverted_cone(color))))
            .collect(),
        visual_variables: vec![
            VisualVariable::Rotation {
                field: ROTATION_FIELD.to_string(),
                axis: RotationAxis::Heading,
            },
            VisualVariable::Size {
                axis: SizeAxis::Height,
                expression: SizeExpression::Linear {
                    baseline: SIZE_BASELINE,
                    coefficient: SIZE_PER_VELOCITY,
                    field: VELOCITY_FIELD.to_string(),
                },
            },
            VisualVariable::Size {
                axis: SizeAxis::WidthAndDepth,
                expression: SizeExpression::Constant(SIZE_BASELINE),
            },
        ],
    }
}

/// Replacement renderer for the belt layer: one tube per unique value,
/// color carried over, no visual variables.
pub fn conveyor_belt_renderer(source: Option<&Renderer>) -> Renderer {
    Renderer {
        classes: carried_colors(source)
            .into_iter()
            .map(|color| ClassInfo::new(Symbol::Tube(TubeSymbol::standard(color))))
            .collect(),
        visual_variables: Vec::new(),
    }
}
