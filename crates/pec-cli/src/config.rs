use crate::error::{CliError, Result};
use pec_core::core::models::machine::MachineProfile;
use pec_core::core::models::pattern::Pattern;
use pec_core::core::psf::params::PsfParameters;
use pec_core::engine::config::CorrectionConfig;
use serde::Deserialize;
use std::path::Path;

/// One correction run as described by a TOML configuration file:
///
/// ```toml
/// [machine]
/// grid_resolution_nm = 1.0
/// max_clock_hz = 50e6
/// beam_current_a = 2e-9
///
/// [correction]
/// base_dose_uc_cm2 = 400.0
/// threshold_uc_cm2 = 400.0
/// max_correction_ratio = 3.0
/// shot_pitch_multiple = 4
///
/// [psf]                      # optional; `--psf-table` fits one instead
/// alpha = 1.0
/// beta = 3.0
/// sigma_f_nm = 30.0
/// sigma_b_nm = 3000.0
///
/// [[pattern]]
/// kind = "square"
/// center = [0.0, 0.0]
/// size = 100.0
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub machine: MachineProfile,
    pub correction: CorrectionConfig,
    #[serde(default)]
    pub psf: Option<PsfParameters>,
    #[serde(rename = "pattern", default)]
    pub patterns: Vec<Pattern>,
}

pub fn load(path: &Path) -> Result<RunConfig> {
    let text =
        std::fs::read_to_string(path).map_err(|e| CliError::file_parsing(path, e))?;
    let config: RunConfig =
        toml::from_str(&text).map_err(|e| CliError::file_parsing(path, e))?;

    config
        .correction
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    if config.patterns.is_empty() {
        return Err(CliError::Config(format!(
            "run file '{}' defines no [[pattern]] entries",
            path.display()
        )));
    }
    Ok(config)
}
