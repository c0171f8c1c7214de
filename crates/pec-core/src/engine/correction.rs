use crate::core::models::layout::ExposureLayout;
use crate::engine::config::CorrectionConfig;
use crate::engine::error::EngineError;
use crate::engine::state::{BackgroundEstimate, CorrectionTable, FeatureCorrection};
use tracing::{instrument, warn};

/// Solves the per-feature dose-correction factors.
///
/// For each feature, the primary dose still required after the background is
/// `threshold - background`; the dose factor is that requirement over the base
/// dose, clamped to `[1/max_correction_ratio, max_correction_ratio]`. A
/// non-positive requirement means the neighbors alone already reach the
/// development threshold: the factor is clamped to its floor (the minimum
/// deliverable dose) and the feature is flagged `over_exposure_risk` instead
/// of silently dropping to zero or negative dose.
#[instrument(skip_all, name = "dose_solve")]
pub fn solve_correction(
    layout: &ExposureLayout,
    background: &BackgroundEstimate,
    config: &CorrectionConfig,
) -> Result<CorrectionTable, EngineError> {
    if layout.is_empty() {
        return Err(EngineError::EmptyPatternSet);
    }

    let floor = 1.0 / config.max_correction_ratio;
    let ceiling = config.max_correction_ratio;

    let mut table = CorrectionTable::new();
    for (id, _) in layout.iter() {
        let proximity = background.dose_for(id);
        let required_primary = config.threshold_uc_cm2 - proximity;
        let over_exposure_risk = required_primary <= 0.0;

        let dose_factor = if over_exposure_risk {
            floor
        } else {
            (required_primary / config.base_dose_uc_cm2).clamp(floor, ceiling)
        };

        let corrected = config.base_dose_uc_cm2 * dose_factor;
        table.insert(
            id,
            FeatureCorrection {
                dose_factor,
                corrected_dose_uc_cm2: corrected,
                proximity_dose_uc_cm2: proximity,
                total_dose_uc_cm2: corrected + proximity,
                over_exposure_risk,
            },
        );
    }

    if table.any_over_exposure_risk() {
        warn!(
            "one or more features already exceed the development threshold from \
             background dose alone; their factors were clamped to {floor:.4}"
        );
    }

    Ok(table)
}
