use crate::core::models::layout::ExposureLayout;
use crate::core::psf::params::PsfParameters;
use crate::engine::error::EngineError;
use crate::engine::state::BackgroundEstimate;
use itertools::Itertools;
use tracing::instrument;

/// Estimates the background (proximity) dose every feature receives from all
/// other features.
///
/// For each unordered pair of distinct features, the center-to-center distance
/// is evaluated against the exponential backscatter falloff
/// `eta * base_dose * exp(-distance / sigma_b)` with `eta = alpha / beta`, and
/// the contribution is added to both features' running backgrounds. This is a
/// mean-field center-to-center approximation, not a shot-by-shot convolution;
/// the same policy is used everywhere in the pipeline.
#[instrument(skip_all, name = "background_estimation")]
pub fn estimate_background(
    layout: &ExposureLayout,
    psf: &PsfParameters,
    base_dose_uc_cm2: f64,
) -> Result<BackgroundEstimate, EngineError> {
    if layout.is_empty() {
        return Err(EngineError::EmptyPatternSet);
    }
    if let Some(reason) = psf.degeneracy() {
        return Err(EngineError::DegeneratePsf { reason });
    }

    let eta = psf.backscatter_ratio();
    let mut background = BackgroundEstimate::new();
    for (id, _) in layout.iter() {
        background.insert(id, 0.0);
    }

    for pair in layout.iter().combinations(2) {
        let (id_a, feature_a) = pair[0];
        let (id_b, feature_b) = pair[1];

        let distance_nm = (feature_a.center - feature_b.center).norm();
        let contribution = eta * base_dose_uc_cm2 * (-distance_nm / psf.sigma_b_nm).exp();

        // The falloff is symmetric in the pair, so one evaluation feeds both
        // ordered directions.
        background.add(id_a, contribution);
        background.add(id_b, contribution);
    }

    Ok(background)
}
