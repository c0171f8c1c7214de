use crate::core::models::machine::MachineProfile;
use serde::{Deserialize, Serialize};

/// Elementary charge in coulombs.
pub const ELEMENTARY_CHARGE_C: f64 = 1.602_176_634e-19;

/// Rounding policy for converting a dose ratio into a whole shot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingPolicy {
    /// Round to the nearest count; used for simulation-time estimates.
    Nearest,
    /// Round down; used for guaranteed-not-to-exceed dosing.
    Floor,
}

/// Areal dose delivered by one shot, in µC/cm².
///
/// `dose = (I_nA * 100) / (f_MHz * step_nm^2)`; the factor 100 converts the
/// nA·µs charge per shot into the µC/cm² convention used downstream. The
/// identity is a fixed unit-conversion contract and is reproduced exactly.
pub fn dose_per_shot_uc_cm2(beam_current_na: f64, step_nm: f64, clock_mhz: f64) -> f64 {
    (beam_current_na * 100.0) / (clock_mhz * step_nm * step_nm)
}

/// The clock frequency plan for a target dose, with the hardware rate ceiling
/// applied.
///
/// Clamping is a valid degraded mode, not an error: when the requested
/// frequency exceeds the machine ceiling the effective frequency is the
/// ceiling, the achieved dose rises above the target, and the caller inspects
/// [`ClockPlan::clamped`] to decide whether that is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockPlan {
    /// Frequency that would hit the target dose exactly, in Hz.
    pub requested_hz: f64,
    /// Frequency after the ceiling clamp, in Hz.
    pub effective_hz: f64,
    /// Target areal dose in µC/cm².
    pub target_dose_uc_cm2: f64,
    /// Dose actually delivered per shot at the effective frequency, in µC/cm².
    pub achieved_dose_uc_cm2: f64,
}

impl ClockPlan {
    /// Whether the rate ceiling limited the plan.
    pub fn clamped(&self) -> bool {
        self.effective_hz < self.requested_hz
    }

    /// Per-shot dwell time at the effective frequency, in seconds.
    pub fn dwell_time_s(&self) -> f64 {
        1.0 / self.effective_hz
    }
}

/// Solves the dose identity for the clock frequency hitting `target_dose`,
/// clamped to the machine's frequency ceiling.
pub fn clock_frequency_for(
    target_dose_uc_cm2: f64,
    machine: &MachineProfile,
    step_nm: f64,
) -> ClockPlan {
    let required_mhz =
        (machine.beam_current_na() * 100.0) / (target_dose_uc_cm2 * step_nm * step_nm);
    let requested_hz = required_mhz * 1e6;
    let effective_hz = requested_hz.min(machine.max_clock_hz);
    let achieved_dose_uc_cm2 =
        dose_per_shot_uc_cm2(machine.beam_current_na(), step_nm, effective_hz / 1e6);

    ClockPlan {
        requested_hz,
        effective_hz,
        target_dose_uc_cm2,
        achieved_dose_uc_cm2,
    }
}

/// Number of shots needed to accumulate `target_dose` at `dose_per_shot`,
/// under the caller's rounding policy.
pub fn shots_needed(target_dose_uc_cm2: f64, dose_per_shot_uc_cm2: f64, policy: RoundingPolicy) -> u64 {
    let ratio = target_dose_uc_cm2 / dose_per_shot_uc_cm2;
    let rounded = match policy {
        RoundingPolicy::Nearest => ratio.round(),
        RoundingPolicy::Floor => ratio.floor(),
    };
    rounded.max(0.0) as u64
}

/// Electrons delivered in one shot of `dwell_time_s` at `beam_current_a`.
pub fn electrons_per_shot(beam_current_a: f64, dwell_time_s: f64) -> f64 {
    (beam_current_a * dwell_time_s / ELEMENTARY_CHARGE_C).max(0.0)
}
