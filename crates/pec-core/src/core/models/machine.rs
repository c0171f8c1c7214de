use serde::{Deserialize, Serialize};

/// The fixed hardware profile of the exposure tool.
///
/// Loaded once from configuration and never mutated during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineProfile {
    /// Base placement grid step of the machine in nm; exposure grids are
    /// integer multiples of this.
    pub grid_resolution_nm: f64,
    /// Pattern-generator clock ceiling in Hz.
    pub max_clock_hz: f64,
    /// Beam current in amperes.
    pub beam_current_a: f64,
}

impl MachineProfile {
    /// Beam current in nA, the unit the dose identities are written in.
    pub fn beam_current_na(&self) -> f64 {
        self.beam_current_a * 1e9
    }

    /// Clock ceiling in MHz.
    pub fn max_clock_mhz(&self) -> f64 {
        self.max_clock_hz / 1e6
    }

    /// Exposure grid step for a given shot-pitch multiple, in nm.
    pub fn exposure_grid_step_nm(&self, shot_pitch_multiple: u32) -> f64 {
        self.grid_resolution_nm * shot_pitch_multiple as f64
    }
}
