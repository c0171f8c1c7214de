use super::ids::FeatureId;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Topological classification of a shot within its feature's lattice.
///
/// A shot is `Corner` if it lies on an extremal lattice index along both axes,
/// `Edge` if extremal along exactly one axis, otherwise `Interior`. "Extremal"
/// means index 0 or `count - 1` along that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotRank {
    Interior,
    Edge,
    Corner,
}

/// One discrete machine exposure event.
///
/// Geometry and rank are fixed at generation time; only the dose-factor fields
/// are updated by the conversion and correction stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Lattice position in layout coordinates (nm).
    pub position: Point2<f64>,
    /// Topological rank within the owning feature's lattice.
    pub rank: ShotRank,
    /// The feature this shot belongs to.
    pub feature: FeatureId,
    /// Dose factor before proximity correction, relative to the base dose.
    pub nominal_dose_factor: f64,
    /// Dose factor after proximity correction; `None` until the solver runs.
    pub corrected_dose_factor: Option<f64>,
}

impl Shot {
    /// Creates a new uncorrected shot with a unit nominal dose factor.
    pub fn new(position: Point2<f64>, rank: ShotRank, feature: FeatureId) -> Self {
        Self {
            position,
            rank,
            feature,
            nominal_dose_factor: 1.0,
            corrected_dose_factor: None,
        }
    }

    /// The dose factor that will actually be delivered: the corrected factor
    /// when the solver has run, the nominal factor otherwise.
    pub fn effective_dose_factor(&self) -> f64 {
        self.corrected_dose_factor
            .unwrap_or(self.nominal_dose_factor)
    }
}
