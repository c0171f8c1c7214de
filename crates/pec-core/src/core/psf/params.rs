use super::kernel;
use serde::{Deserialize, Serialize};

/// Fitted two-Gaussian point-spread-function parameters.
///
/// The forward-scatter term `(alpha, sigma_f)` is the short-range Gaussian and
/// the backscatter term `(beta, sigma_b)` the long-range one; `sigma_f <
/// sigma_b` holds by construction. Derived quantities (forward fraction,
/// backscatter ratio, containment radii) are computed on demand and never
/// stored redundantly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsfParameters {
    /// Forward-scatter amplitude.
    pub alpha: f64,
    /// Backscatter amplitude.
    pub beta: f64,
    /// Forward-scatter range in nm.
    pub sigma_f_nm: f64,
    /// Backscatter range in nm.
    pub sigma_b_nm: f64,
    /// Goodness of fit, `1 - SS_res / SS_tot`, clamped to `0..=1`. Defaults to
    /// zero for parameter sets supplied by hand rather than fitted.
    #[serde(default)]
    pub goodness: f64,
}

impl PsfParameters {
    /// Evaluates the energy-deposition density at radius `r` nm.
    pub fn density(&self, r: f64) -> f64 {
        kernel::two_gaussian(r, self.alpha, self.beta, self.sigma_f_nm, self.sigma_b_nm)
    }

    /// Density at the exposure point, the curve's peak amplitude.
    pub fn peak_amplitude(&self) -> f64 {
        self.density(0.0)
    }

    /// Normalized forward fraction `alpha / (alpha + beta)`.
    pub fn forward_fraction(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// The amplitude ratio `eta = alpha / beta` entering the mean-field
    /// background estimate.
    pub fn backscatter_ratio(&self) -> f64 {
        self.alpha / self.beta
    }

    /// Checks the parameter set is usable by the correction engine.
    ///
    /// Returns the reason the parameters are degenerate, or `None` when they
    /// are sound.
    pub fn degeneracy(&self) -> Option<String> {
        let fields = [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("sigma_f_nm", self.sigma_f_nm),
            ("sigma_b_nm", self.sigma_b_nm),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Some(format!("{name} must be finite and positive, got {value}"));
            }
        }
        if self.sigma_f_nm >= self.sigma_b_nm {
            return Some(format!(
                "forward range sigma_f ({} nm) must be below backscatter range sigma_b ({} nm)",
                self.sigma_f_nm, self.sigma_b_nm
            ));
        }
        None
    }
}
