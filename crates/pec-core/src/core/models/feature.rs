use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// The shape of a leaf exposure unit after pattern flattening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureShape {
    /// A filled square of side `size` nm.
    Square { size: f64 },
    /// A single shot row of `length` nm with a nominal drawn width.
    Line { length: f64, width: f64 },
}

impl FeatureShape {
    /// Human-readable shape name used in reports and log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureShape::Square { .. } => "square",
            FeatureShape::Line { .. } => "line",
        }
    }

    /// The characteristic size used for shot-count rules: side length for a
    /// square, length along the long axis for a line.
    pub fn primary_extent(&self) -> f64 {
        match self {
            FeatureShape::Square { size } => *size,
            FeatureShape::Line { length, .. } => *length,
        }
    }
}

/// A leaf exposure unit: one shape at an absolute position.
///
/// Features are the granularity at which proximity correction operates; every
/// shot carries the ID of the feature it belongs to so the solver can group
/// shots per feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Center of the feature in layout coordinates (nm).
    pub center: Point2<f64>,
    /// The feature's shape and dimensions.
    pub shape: FeatureShape,
}
