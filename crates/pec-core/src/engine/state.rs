use crate::core::models::ids::FeatureId;
use slotmap::SecondaryMap;

/// The solver's progress through its three-stage state machine.
///
/// `Uncorrected -> BackgroundEstimated -> Corrected`. Each transition is a
/// pure function of the current pattern/dose configuration, so re-running
/// either step from scratch is always safe; the stage exists for
/// introspection and logging, not for hidden incremental state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStage {
    Uncorrected,
    BackgroundEstimated,
    Corrected,
}

impl SolverStage {
    pub fn name(&self) -> &'static str {
        match self {
            SolverStage::Uncorrected => "uncorrected",
            SolverStage::BackgroundEstimated => "background-estimated",
            SolverStage::Corrected => "corrected",
        }
    }
}

/// Per-feature background (proximity) dose in µC/cm², produced by the
/// `Uncorrected -> BackgroundEstimated` transition.
#[derive(Debug, Clone, Default)]
pub struct BackgroundEstimate {
    values: SecondaryMap<FeatureId, f64>,
}

impl BackgroundEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FeatureId, dose_uc_cm2: f64) {
        self.values.insert(id, dose_uc_cm2);
    }

    pub fn add(&mut self, id: FeatureId, dose_uc_cm2: f64) {
        let current = self.values.get(id).copied().unwrap_or(0.0);
        self.values.insert(id, current + dose_uc_cm2);
    }

    /// Background dose for a feature; features without recorded neighbors
    /// have zero background.
    pub fn dose_for(&self, id: FeatureId) -> f64 {
        self.values.get(id).copied().unwrap_or(0.0)
    }
}

/// One feature's solved correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureCorrection {
    /// Dose factor relative to the base dose, clamped to the solver bounds.
    pub dose_factor: f64,
    /// `base_dose * dose_factor`, in µC/cm².
    pub corrected_dose_uc_cm2: f64,
    /// The neighbor-induced background dose, in µC/cm².
    pub proximity_dose_uc_cm2: f64,
    /// `corrected_dose + proximity_dose`, in µC/cm².
    pub total_dose_uc_cm2: f64,
    /// Set when the required primary dose was non-positive and the factor was
    /// clamped to its floor; the caller decides the remediation.
    pub over_exposure_risk: bool,
}

/// The solved correction table, keyed by feature.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTable {
    entries: SecondaryMap<FeatureId, FeatureCorrection>,
}

impl CorrectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FeatureId, correction: FeatureCorrection) {
        self.entries.insert(id, correction);
    }

    pub fn correction_for(&self, id: FeatureId) -> Option<&FeatureCorrection> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &FeatureCorrection)> {
        self.entries.iter()
    }

    /// Whether any feature carries the over-exposure-risk flag.
    pub fn any_over_exposure_risk(&self) -> bool {
        self.entries.values().any(|c| c.over_exposure_risk)
    }
}

/// Spread statistics of the total dose across features, the solver's
/// uniformity figure of merit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseUniformity {
    pub min_total_uc_cm2: f64,
    pub max_total_uc_cm2: f64,
    pub mean_total_uc_cm2: f64,
    /// `(max - min) / mean`; zero for a perfectly uniform layout.
    pub relative_spread: f64,
}

impl DoseUniformity {
    /// Computes uniformity over the table's total doses. Returns `None` for
    /// an empty table.
    pub fn from_table(table: &CorrectionTable) -> Option<Self> {
        if table.is_empty() {
            return None;
        }
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut sum = 0.0;
        for (_, correction) in table.iter() {
            min = min.min(correction.total_dose_uc_cm2);
            max = max.max(correction.total_dose_uc_cm2);
            sum += correction.total_dose_uc_cm2;
        }
        let mean = sum / table.len() as f64;
        let relative_spread = if mean != 0.0 { (max - min) / mean } else { 0.0 };
        Some(Self {
            min_total_uc_cm2: min,
            max_total_uc_cm2: max,
            mean_total_uc_cm2: mean,
            relative_spread,
        })
    }
}
