use super::feature::{Feature, FeatureShape};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// An abstract exposure pattern in layout coordinates (nm).
///
/// Patterns are read-only geometry descriptions. A composite pattern exclusively
/// owns its children; there are no back-references. The enum is deliberately a
/// closed sum type: shot-count and rank-classification rules are defined per
/// shape, and exhaustive matching guarantees an unhandled shape cannot silently
/// no-op downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// A filled square of side `size`, centered at `center`.
    Square {
        /// Center of the square in layout coordinates (nm).
        center: Point2<f64>,
        /// Side length in nm.
        size: f64,
    },
    /// A single-pass line of `length` along the x axis with a fixed nominal width.
    Line {
        /// Center of the line in layout coordinates (nm).
        center: Point2<f64>,
        /// Length along the long (x) axis in nm.
        length: f64,
        /// Nominal drawn width in nm; the exposure itself is a single shot row.
        width: f64,
    },
    /// A rectangular array of identical squares on a regular pitch.
    Array {
        /// Center of the whole array in layout coordinates (nm).
        center: Point2<f64>,
        /// Side length of each array element in nm.
        element_size: f64,
        /// Center-to-center element spacing in nm.
        pitch: f64,
        /// Element count along x.
        columns: u32,
        /// Element count along y.
        rows: u32,
    },
    /// A group of sub-patterns exposed together.
    Composite {
        /// The owned sub-patterns, in exposure order.
        children: Vec<Pattern>,
    },
}

impl Pattern {
    /// Flattens this pattern into leaf exposure features with absolute centers.
    ///
    /// Squares and lines map to a single feature. Arrays expand into one square
    /// feature per element, row-major from the minimum corner, so downstream
    /// per-feature correction sees every element as its own neighbor. Composites
    /// concatenate their children's features in order.
    pub fn flatten(&self) -> Vec<Feature> {
        let mut features = Vec::new();
        self.flatten_into(&mut features);
        features
    }

    fn flatten_into(&self, out: &mut Vec<Feature>) {
        match self {
            Pattern::Square { center, size } => out.push(Feature {
                center: *center,
                shape: FeatureShape::Square { size: *size },
            }),
            Pattern::Line {
                center,
                length,
                width,
            } => out.push(Feature {
                center: *center,
                shape: FeatureShape::Line {
                    length: *length,
                    width: *width,
                },
            }),
            Pattern::Array {
                center,
                element_size,
                pitch,
                columns,
                rows,
            } => {
                let half_x = (columns.saturating_sub(1)) as f64 / 2.0;
                let half_y = (rows.saturating_sub(1)) as f64 / 2.0;
                for row in 0..*rows {
                    for col in 0..*columns {
                        let offset = Vector2::new(
                            (col as f64 - half_x) * pitch,
                            (row as f64 - half_y) * pitch,
                        );
                        out.push(Feature {
                            center: center + offset,
                            shape: FeatureShape::Square {
                                size: *element_size,
                            },
                        });
                    }
                }
            }
            Pattern::Composite { children } => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_flattens_to_a_single_feature() {
        let pattern = Pattern::Square {
            center: Point2::new(10.0, -5.0),
            size: 100.0,
        };
        let features = pattern.flatten();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].center, Point2::new(10.0, -5.0));
        assert_eq!(features[0].shape, FeatureShape::Square { size: 100.0 });
    }

    #[test]
    fn array_expands_to_one_feature_per_element_centered_on_the_array() {
        let pattern = Pattern::Array {
            center: Point2::new(0.0, 0.0),
            element_size: 50.0,
            pitch: 200.0,
            columns: 3,
            rows: 1,
        };
        let features = pattern.flatten();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].center, Point2::new(-200.0, 0.0));
        assert_eq!(features[1].center, Point2::new(0.0, 0.0));
        assert_eq!(features[2].center, Point2::new(200.0, 0.0));
    }

    #[test]
    fn single_element_array_sits_at_the_array_center() {
        let pattern = Pattern::Array {
            center: Point2::new(7.0, 3.0),
            element_size: 20.0,
            pitch: 100.0,
            columns: 1,
            rows: 1,
        };
        let features = pattern.flatten();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].center, Point2::new(7.0, 3.0));
    }

    #[test]
    fn composite_concatenates_children_in_order() {
        let pattern = Pattern::Composite {
            children: vec![
                Pattern::Square {
                    center: Point2::new(-300.0, 0.0),
                    size: 100.0,
                },
                Pattern::Line {
                    center: Point2::new(0.0, 0.0),
                    length: 500.0,
                    width: 20.0,
                },
            ],
        };
        let features = pattern.flatten();
        assert_eq!(features.len(), 2);
        assert!(matches!(features[0].shape, FeatureShape::Square { .. }));
        assert!(matches!(features[1].shape, FeatureShape::Line { .. }));
    }

    #[test]
    fn pattern_round_trips_through_toml() {
        let pattern = Pattern::Square {
            center: Point2::new(1.0, 2.0),
            size: 100.0,
        };
        let text = toml::to_string(&pattern).unwrap();
        let back: Pattern = toml::from_str(&text).unwrap();
        assert_eq!(back, pattern);
    }
}
