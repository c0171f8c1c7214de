use serde::{Deserialize, Serialize};

/// One radial energy-deposition sample from the transport simulator.
///
/// Samples arrive as an ordered sequence sorted by radius and are immutable
/// once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialDoseSample {
    /// Distance from the exposure point in nm.
    pub radius_nm: f64,
    /// Deposited energy density at that radius (simulator units).
    pub energy_density: f64,
}

impl RadialDoseSample {
    pub fn new(radius_nm: f64, energy_density: f64) -> Self {
        Self {
            radius_nm,
            energy_density,
        }
    }

    /// Whether this sample can participate in a fit: finite, non-negative
    /// radius and finite, strictly positive energy.
    pub fn is_valid(&self) -> bool {
        self.radius_nm.is_finite()
            && self.radius_nm >= 0.0
            && self.energy_density.is_finite()
            && self.energy_density > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_and_non_positive_samples() {
        assert!(RadialDoseSample::new(10.0, 1e-4).is_valid());
        assert!(!RadialDoseSample::new(f64::NAN, 1e-4).is_valid());
        assert!(!RadialDoseSample::new(10.0, f64::INFINITY).is_valid());
        assert!(!RadialDoseSample::new(10.0, 0.0).is_valid());
        assert!(!RadialDoseSample::new(10.0, -1.0).is_valid());
        assert!(!RadialDoseSample::new(-5.0, 1e-4).is_valid());
    }

    #[test]
    fn zero_radius_is_a_valid_sample() {
        assert!(RadialDoseSample::new(0.0, 1.0).is_valid());
    }
}
