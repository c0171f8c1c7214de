use crate::core::models::feature::{Feature, FeatureShape};
use crate::core::models::ids::FeatureId;
use crate::core::models::layout::ExposureLayout;
use crate::core::models::machine::MachineProfile;
use crate::core::models::shot::{Shot, ShotRank};
use nalgebra::Point2;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Invalid geometry for {kind} feature: {reason}")]
    InvalidGeometry { kind: &'static str, reason: String },
}

/// Rasterizes features onto the machine's exposure lattice.
///
/// The exposure grid step is the machine grid resolution times the shot-pitch
/// multiple. A feature of extent `S` gets `floor(S / step)` lattice positions
/// per axis, spanning `[-S/2, S/2)` around the feature center; squares fill
/// both axes, lines a single row along their long axis.
pub struct ShotGridGenerator<'a> {
    machine: &'a MachineProfile,
    shot_pitch_multiple: u32,
}

impl<'a> ShotGridGenerator<'a> {
    pub fn new(machine: &'a MachineProfile, shot_pitch_multiple: u32) -> Self {
        Self {
            machine,
            shot_pitch_multiple,
        }
    }

    /// The exposure grid step in nm.
    pub fn exposure_grid_step_nm(&self) -> f64 {
        self.machine.exposure_grid_step_nm(self.shot_pitch_multiple)
    }

    /// Generates shots for every feature of the layout, concatenated in layout
    /// order. Each shot carries the ID of the feature that produced it.
    pub fn generate(&self, layout: &ExposureLayout) -> Result<Vec<Shot>, GridError> {
        let mut shots = Vec::new();
        for (id, feature) in layout.iter() {
            shots.extend(self.generate_feature(id, feature)?);
        }
        debug!(
            shot_count = shots.len(),
            feature_count = layout.len(),
            "generated shot grid"
        );
        Ok(shots)
    }

    /// Generates the shot lattice for a single feature.
    pub fn generate_feature(
        &self,
        id: FeatureId,
        feature: &Feature,
    ) -> Result<Vec<Shot>, GridError> {
        let step = self.exposure_grid_step_nm();
        let kind = feature.shape.kind_name();
        if !(step > 0.0) {
            return Err(GridError::InvalidGeometry {
                kind,
                reason: format!("exposure grid step must be positive, got {step} nm"),
            });
        }

        match feature.shape {
            FeatureShape::Square { size } => {
                ensure_positive_extent(kind, "size", size)?;
                let count = (size / step) as usize;
                let origin = Point2::new(feature.center.x - size / 2.0, feature.center.y - size / 2.0);
                Ok(lattice(id, origin, step, count, count))
            }
            FeatureShape::Line { length, width } => {
                ensure_positive_extent(kind, "length", length)?;
                ensure_positive_extent(kind, "width", width)?;
                let count = (length / step) as usize;
                let origin = Point2::new(feature.center.x - length / 2.0, feature.center.y);
                Ok(lattice(id, origin, step, count, 1))
            }
        }
    }
}

fn ensure_positive_extent(kind: &'static str, name: &str, value: f64) -> Result<(), GridError> {
    if !(value > 0.0) {
        return Err(GridError::InvalidGeometry {
            kind,
            reason: format!("{name} must be positive, got {value} nm"),
        });
    }
    Ok(())
}

/// A shot is `Corner` on an extremal index along both axes, `Edge` on exactly
/// one, `Interior` otherwise; extremal means index 0 or `count - 1`.
fn classify(ix: usize, nx: usize, iy: usize, ny: usize) -> ShotRank {
    let extremal_x = ix == 0 || ix + 1 == nx;
    let extremal_y = iy == 0 || iy + 1 == ny;
    match (extremal_x, extremal_y) {
        (true, true) => ShotRank::Corner,
        (true, false) | (false, true) => ShotRank::Edge,
        (false, false) => ShotRank::Interior,
    }
}

fn lattice(id: FeatureId, origin: Point2<f64>, step: f64, nx: usize, ny: usize) -> Vec<Shot> {
    let mut shots = Vec::with_capacity(nx * ny);
    for iy in 0..ny {
        for ix in 0..nx {
            let position = Point2::new(origin.x + ix as f64 * step, origin.y + iy as f64 * step);
            shots.push(Shot::new(position, classify(ix, nx, iy, ny), id));
        }
    }
    shots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::pattern::Pattern;

    fn machine(grid_resolution_nm: f64) -> MachineProfile {
        MachineProfile {
            grid_resolution_nm,
            max_clock_hz: 50e6,
            beam_current_a: 2e-9,
        }
    }

    fn square_layout(size: f64) -> ExposureLayout {
        ExposureLayout::from_patterns(&[Pattern::Square {
            center: Point2::origin(),
            size,
        }])
    }

    #[test]
    fn thousand_nm_square_on_a_4nm_grid_yields_62500_shots() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 4);
        let shots = generator.generate(&square_layout(1000.0)).unwrap();
        assert_eq!(shots.len(), 250 * 250);
    }

    #[test]
    fn rank_census_of_the_square_lattice_is_exact() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 4);
        let shots = generator.generate(&square_layout(1000.0)).unwrap();

        let corners = shots.iter().filter(|s| s.rank == ShotRank::Corner).count();
        let edges = shots.iter().filter(|s| s.rank == ShotRank::Edge).count();
        let interior = shots.iter().filter(|s| s.rank == ShotRank::Interior).count();

        assert_eq!(corners, 4);
        assert_eq!(edges, 4 * (250 - 2));
        assert_eq!(interior, 248 * 248);
        assert_eq!(corners + edges + interior, shots.len());
    }

    #[test]
    fn lattice_spans_the_half_open_interval() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 4);
        let shots = generator.generate(&square_layout(1000.0)).unwrap();

        let min_x = shots.iter().map(|s| s.position.x).fold(f64::MAX, f64::min);
        let max_x = shots.iter().map(|s| s.position.x).fold(f64::MIN, f64::max);
        assert_eq!(min_x, -500.0);
        assert_eq!(max_x, 496.0);
    }

    #[test]
    fn line_features_produce_a_single_row_with_corner_ends() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 4);
        let layout = ExposureLayout::from_patterns(&[Pattern::Line {
            center: Point2::origin(),
            length: 40.0,
            width: 8.0,
        }]);
        let shots = generator.generate(&layout).unwrap();

        assert_eq!(shots.len(), 10);
        assert!(shots.iter().all(|s| s.position.y == 0.0));
        assert_eq!(shots.first().unwrap().rank, ShotRank::Corner);
        assert_eq!(shots.last().unwrap().rank, ShotRank::Corner);
        assert!(
            shots[1..9].iter().all(|s| s.rank == ShotRank::Edge),
            "inner line shots are edges"
        );
    }

    #[test]
    fn single_shot_feature_is_a_corner() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 4);
        let shots = generator.generate(&square_layout(7.0)).unwrap();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].rank, ShotRank::Corner);
    }

    #[test]
    fn non_positive_size_is_invalid_geometry() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 4);
        let result = generator.generate(&square_layout(-10.0));
        assert!(matches!(
            result,
            Err(GridError::InvalidGeometry { kind: "square", .. })
        ));
    }

    #[test]
    fn zero_pitch_multiple_is_invalid_geometry() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 0);
        let result = generator.generate(&square_layout(100.0));
        assert!(matches!(result, Err(GridError::InvalidGeometry { .. })));
    }

    #[test]
    fn shots_carry_their_feature_ids() {
        let machine = machine(1.0);
        let generator = ShotGridGenerator::new(&machine, 4);
        let layout = ExposureLayout::from_patterns(&[
            Pattern::Square {
                center: Point2::new(-300.0, 0.0),
                size: 40.0,
            },
            Pattern::Square {
                center: Point2::new(300.0, 0.0),
                size: 40.0,
            },
        ]);
        let ids: Vec<_> = layout.iter().map(|(id, _)| id).collect();
        let shots = generator.generate(&layout).unwrap();

        assert_eq!(shots.len(), 200);
        assert!(shots[..100].iter().all(|s| s.feature == ids[0]));
        assert!(shots[100..].iter().all(|s| s.feature == ids[1]));
    }
}
