use crate::core::io::report::{ClockSettings, CorrectionReport, FeatureRecord, SolverSettings};
use crate::core::models::ids::FeatureId;
use crate::core::models::layout::ExposureLayout;
use crate::core::models::machine::MachineProfile;
use crate::core::models::shot::Shot;
use crate::core::psf::params::PsfParameters;
use crate::engine::background::estimate_background;
use crate::engine::config::CorrectionConfig;
use crate::engine::correction::solve_correction;
use crate::engine::dose::{ClockPlan, clock_frequency_for};
use crate::engine::error::EngineError;
use crate::engine::grid::ShotGridGenerator;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{BackgroundEstimate, CorrectionTable, DoseUniformity, SolverStage};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Everything the correction pipeline produces for one layout.
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    /// All shots, carrying nominal and corrected dose factors.
    pub shots: Vec<Shot>,
    /// The per-feature correction table.
    pub table: CorrectionTable,
    /// The per-feature background estimate the table was solved against.
    pub background: BackgroundEstimate,
    /// The clock plan for the base dose, including any rate-ceiling clamp.
    pub clock_plan: ClockPlan,
    /// Total-dose spread statistics across features.
    pub uniformity: Option<DoseUniformity>,
    /// Final solver stage; `Corrected` on success.
    pub stage: SolverStage,
}

/// Runs the full proximity-correction pipeline.
///
/// Stages, in order: rasterize the layout into shots, plan the clock for the
/// base dose (clamping surfaced through the returned [`ClockPlan`] and a
/// warning), estimate the pairwise backscatter background, solve the bounded
/// per-feature dose factors, and stamp the corrected factors onto every shot.
/// Each stage is a pure function of its inputs; re-running the workflow on
/// the same inputs reproduces the same result.
#[instrument(skip_all, name = "correction_workflow")]
pub fn run(
    layout: &ExposureLayout,
    machine: &MachineProfile,
    psf: &PsfParameters,
    config: &CorrectionConfig,
    reporter: &ProgressReporter,
) -> Result<CorrectionResult, EngineError> {
    config.validate()?;
    let mut stage = SolverStage::Uncorrected;
    info!(
        feature_count = layout.len(),
        stage = stage.name(),
        "starting proximity correction"
    );

    // === Stage 1: shot-grid generation ===
    reporter.report(Progress::StageStart { name: "shot-grid" });
    let generator = ShotGridGenerator::new(machine, config.shot_pitch_multiple);
    let mut shots = generator.generate(layout)?;
    reporter.report(Progress::ShotsGenerated {
        count: shots.len() as u64,
    });
    reporter.report(Progress::StageFinish);

    // === Stage 2: dose/clock planning ===
    reporter.report(Progress::StageStart { name: "dose-plan" });
    let clock_plan = clock_frequency_for(
        config.base_dose_uc_cm2,
        machine,
        generator.exposure_grid_step_nm(),
    );
    if clock_plan.clamped() {
        warn!(
            requested_hz = clock_plan.requested_hz,
            effective_hz = clock_plan.effective_hz,
            achieved_dose_uc_cm2 = clock_plan.achieved_dose_uc_cm2,
            "clock requirement exceeds the machine ceiling; running in clamped mode"
        );
        reporter.report(Progress::Message(format!(
            "clock clamped to {:.3e} Hz; base dose shifts to {:.1} µC/cm²",
            clock_plan.effective_hz, clock_plan.achieved_dose_uc_cm2
        )));
    }
    let nominal_factor = clock_plan.achieved_dose_uc_cm2 / config.base_dose_uc_cm2;
    for shot in &mut shots {
        shot.nominal_dose_factor = nominal_factor;
    }
    reporter.report(Progress::StageFinish);

    // === Stage 3: background estimation ===
    reporter.report(Progress::StageStart { name: "background" });
    let background = estimate_background(layout, psf, config.base_dose_uc_cm2)?;
    stage = SolverStage::BackgroundEstimated;
    info!(stage = stage.name(), "background estimation complete");
    reporter.report(Progress::StageFinish);

    // === Stage 4: dose solve ===
    reporter.report(Progress::StageStart { name: "dose-solve" });
    let table = solve_correction(layout, &background, config)?;
    for shot in &mut shots {
        if let Some(correction) = table.correction_for(shot.feature) {
            shot.corrected_dose_factor = Some(correction.dose_factor * shot.nominal_dose_factor);
        }
    }
    stage = SolverStage::Corrected;
    let uniformity = DoseUniformity::from_table(&table);
    info!(
        stage = stage.name(),
        over_exposure_risk = table.any_over_exposure_risk(),
        "dose solve complete"
    );
    reporter.report(Progress::StageFinish);

    Ok(CorrectionResult {
        shots,
        table,
        background,
        clock_plan,
        uniformity,
        stage,
    })
}

/// Assembles the reproducible run report from a correction result.
///
/// The report carries the fitted PSF, the solver configuration, the clock
/// plan, and one record per feature in layout order.
pub fn build_report(
    layout: &ExposureLayout,
    psf: &PsfParameters,
    config: &CorrectionConfig,
    result: &CorrectionResult,
) -> CorrectionReport {
    let mut shot_counts: HashMap<FeatureId, usize> = HashMap::new();
    for shot in &result.shots {
        *shot_counts.entry(shot.feature).or_insert(0) += 1;
    }

    let features = layout
        .iter()
        .enumerate()
        .filter_map(|(ordinal, (id, feature))| {
            result.table.correction_for(id).map(|correction| FeatureRecord {
                id: ordinal,
                kind: feature.shape.kind_name().to_string(),
                center_nm: [feature.center.x, feature.center.y],
                extent_nm: feature.shape.primary_extent(),
                shot_count: shot_counts.get(&id).copied().unwrap_or(0),
                dose_factor: correction.dose_factor,
                corrected_dose_uc_cm2: correction.corrected_dose_uc_cm2,
                proximity_dose_uc_cm2: correction.proximity_dose_uc_cm2,
                total_dose_uc_cm2: correction.total_dose_uc_cm2,
                over_exposure_risk: correction.over_exposure_risk,
            })
        })
        .collect();

    CorrectionReport {
        psf: *psf,
        solver: SolverSettings {
            base_dose_uc_cm2: config.base_dose_uc_cm2,
            threshold_uc_cm2: config.threshold_uc_cm2,
            max_correction_ratio: config.max_correction_ratio,
            shot_pitch_multiple: config.shot_pitch_multiple,
        },
        clock: ClockSettings {
            requested_hz: result.clock_plan.requested_hz,
            effective_hz: result.clock_plan.effective_hz,
            achieved_dose_uc_cm2: result.clock_plan.achieved_dose_uc_cm2,
            clamped: result.clock_plan.clamped(),
        },
        features,
    }
}
