use crate::core::psf::containment::containment_radius;
use crate::core::psf::fit::{self, FitError};
use crate::core::psf::params::PsfParameters;
use crate::core::psf::sample::RadialDoseSample;
use tracing::{info, instrument};

/// The result of a PSF fit workflow.
#[derive(Debug, Clone, Copy)]
pub struct FitOutcome {
    pub parameters: PsfParameters,
    /// Number of input samples, including any dropped by validity filtering.
    pub sample_count: usize,
}

/// Fits the two-Gaussian PSF from radial dose samples, logging the fitted
/// parameters and their containment radii.
#[instrument(skip_all, name = "psf_fit_workflow")]
pub fn run(samples: &[RadialDoseSample]) -> Result<FitOutcome, FitError> {
    info!(sample_count = samples.len(), "starting PSF fit");

    let parameters = fit::fit(samples)?;
    info!(
        alpha = parameters.alpha,
        beta = parameters.beta,
        sigma_f_nm = parameters.sigma_f_nm,
        sigma_b_nm = parameters.sigma_b_nm,
        goodness = parameters.goodness,
        "PSF fit converged"
    );
    info!(
        r50_nm = containment_radius(&parameters, 0.5),
        r90_nm = containment_radius(&parameters, 0.9),
        "energy containment radii"
    );

    Ok(FitOutcome {
        parameters,
        sample_count: samples.len(),
    })
}
