use super::traits::RecordFile;
use crate::core::psf::params::PsfParameters;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("TOML parsing error: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// The solver settings a run was executed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub base_dose_uc_cm2: f64,
    pub threshold_uc_cm2: f64,
    pub max_correction_ratio: f64,
    pub shot_pitch_multiple: u32,
}

/// The clock plan the dose converter arrived at, including the rate-ceiling
/// clamp state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockSettings {
    pub requested_hz: f64,
    pub effective_hz: f64,
    pub achieved_dose_uc_cm2: f64,
    pub clamped: bool,
}

/// One corrected feature, keyed by its stable ordinal in the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: usize,
    pub kind: String,
    pub center_nm: [f64; 2],
    pub extent_nm: f64,
    pub shot_count: usize,
    pub dose_factor: f64,
    pub corrected_dose_uc_cm2: f64,
    pub proximity_dose_uc_cm2: f64,
    pub total_dose_uc_cm2: f64,
    pub over_exposure_risk: bool,
}

/// The reproducible record of one correction run: the fitted PSF, the solver
/// configuration, the clock plan, and one record per feature. Everything a
/// downstream consumer needs to reproduce the run without re-fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionReport {
    pub psf: PsfParameters,
    pub solver: SolverSettings,
    pub clock: ClockSettings,
    #[serde(rename = "feature", default)]
    pub features: Vec<FeatureRecord>,
}

pub struct ReportFile;

impl RecordFile for ReportFile {
    type Record = CorrectionReport;
    type Error = ReportError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Record, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(toml::from_str(&text)?)
    }

    fn write_to(record: &Self::Record, writer: &mut impl Write) -> Result<(), Self::Error> {
        let text = toml::to_string_pretty(record)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;
    use tempfile::tempdir;

    fn sample_report() -> CorrectionReport {
        CorrectionReport {
            psf: PsfParameters {
                alpha: 1.0,
                beta: 3.0,
                sigma_f_nm: 30.0,
                sigma_b_nm: 3000.0,
                goodness: 0.9995,
            },
            solver: SolverSettings {
                base_dose_uc_cm2: 400.0,
                threshold_uc_cm2: 400.0,
                max_correction_ratio: 3.0,
                shot_pitch_multiple: 4,
            },
            clock: ClockSettings {
                requested_hz: 3.125e6,
                effective_hz: 3.125e6,
                achieved_dose_uc_cm2: 400.0,
                clamped: false,
            },
            features: vec![FeatureRecord {
                id: 0,
                kind: "square".to_string(),
                center_nm: [-300.0, 0.0],
                extent_nm: 100.0,
                shot_count: 625,
                dose_factor: 0.98,
                corrected_dose_uc_cm2: 392.0,
                proximity_dose_uc_cm2: 8.0,
                total_dose_uc_cm2: 400.0,
                over_exposure_risk: false,
            }],
        }
    }

    #[test]
    fn report_round_trips_through_toml() {
        let report = sample_report();
        let mut buffer = Vec::new();
        ReportFile::write_to(&report, &mut buffer).unwrap();
        let back = ReportFile::read_from(&mut BufReader::new(buffer.as_slice())).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn report_round_trips_through_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        let report = sample_report();
        ReportFile::write_to_path(&report, &path).unwrap();
        let back = ReportFile::read_from_path(&path).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn missing_feature_list_defaults_to_empty() {
        let report = sample_report();
        let mut text = toml::to_string_pretty(&report).unwrap();
        let cut = text.find("[[feature]]").unwrap();
        text.truncate(cut);
        let back: CorrectionReport = toml::from_str(&text).unwrap();
        assert!(back.features.is_empty());
    }
}
