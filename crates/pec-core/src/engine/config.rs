use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Validated solver settings for one correction run.
///
/// Construct through [`CorrectionConfigBuilder`] (or deserialize and call
/// [`CorrectionConfig::validate`]); the invariants below hold for every
/// instance handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Nominal areal dose in µC/cm², before correction.
    pub base_dose_uc_cm2: f64,
    /// Development threshold dose in µC/cm² the solver drives totals toward.
    pub threshold_uc_cm2: f64,
    /// Correction factors are clamped to `[1/r, r]` for this ratio `r >= 1`.
    pub max_correction_ratio: f64,
    /// Exposure grid step as a multiple of the machine grid resolution.
    #[serde(default = "default_shot_pitch_multiple")]
    pub shot_pitch_multiple: u32,
}

fn default_shot_pitch_multiple() -> u32 {
    1
}

impl CorrectionConfig {
    /// Checks the field invariants, for configurations that arrive through
    /// deserialization rather than the builder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("base_dose_uc_cm2", self.base_dose_uc_cm2)?;
        ensure_positive("threshold_uc_cm2", self.threshold_uc_cm2)?;
        if !self.max_correction_ratio.is_finite() || self.max_correction_ratio < 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_correction_ratio",
                reason: format!("must be >= 1, got {}", self.max_correction_ratio),
            });
        }
        if self.shot_pitch_multiple == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "shot_pitch_multiple",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be finite and positive, got {value}"),
        });
    }
    Ok(())
}

#[derive(Default)]
pub struct CorrectionConfigBuilder {
    base_dose_uc_cm2: Option<f64>,
    threshold_uc_cm2: Option<f64>,
    max_correction_ratio: Option<f64>,
    shot_pitch_multiple: Option<u32>,
}

impl CorrectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_dose_uc_cm2(mut self, dose: f64) -> Self {
        self.base_dose_uc_cm2 = Some(dose);
        self
    }
    pub fn threshold_uc_cm2(mut self, threshold: f64) -> Self {
        self.threshold_uc_cm2 = Some(threshold);
        self
    }
    pub fn max_correction_ratio(mut self, ratio: f64) -> Self {
        self.max_correction_ratio = Some(ratio);
        self
    }
    pub fn shot_pitch_multiple(mut self, multiple: u32) -> Self {
        self.shot_pitch_multiple = Some(multiple);
        self
    }

    pub fn build(self) -> Result<CorrectionConfig, ConfigError> {
        let config = CorrectionConfig {
            base_dose_uc_cm2: self
                .base_dose_uc_cm2
                .ok_or(ConfigError::MissingParameter("base_dose_uc_cm2"))?,
            threshold_uc_cm2: self
                .threshold_uc_cm2
                .ok_or(ConfigError::MissingParameter("threshold_uc_cm2"))?,
            max_correction_ratio: self
                .max_correction_ratio
                .ok_or(ConfigError::MissingParameter("max_correction_ratio"))?,
            shot_pitch_multiple: self.shot_pitch_multiple.unwrap_or(1),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_a_validated_config() {
        let config = CorrectionConfigBuilder::new()
            .base_dose_uc_cm2(400.0)
            .threshold_uc_cm2(400.0)
            .max_correction_ratio(3.0)
            .shot_pitch_multiple(4)
            .build()
            .unwrap();
        assert_eq!(config.shot_pitch_multiple, 4);
        assert_eq!(config.max_correction_ratio, 3.0);
    }

    #[test]
    fn missing_base_dose_is_reported_by_name() {
        let result = CorrectionConfigBuilder::new()
            .threshold_uc_cm2(400.0)
            .max_correction_ratio(3.0)
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingParameter("base_dose_uc_cm2")
        );
    }

    #[test]
    fn shot_pitch_multiple_defaults_to_the_machine_grid() {
        let config = CorrectionConfigBuilder::new()
            .base_dose_uc_cm2(400.0)
            .threshold_uc_cm2(400.0)
            .max_correction_ratio(3.0)
            .build()
            .unwrap();
        assert_eq!(config.shot_pitch_multiple, 1);
    }

    #[test]
    fn correction_ratio_below_one_is_rejected() {
        let result = CorrectionConfigBuilder::new()
            .base_dose_uc_cm2(400.0)
            .threshold_uc_cm2(400.0)
            .max_correction_ratio(0.5)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "max_correction_ratio",
                ..
            })
        ));
    }

    #[test]
    fn non_positive_doses_are_rejected() {
        let result = CorrectionConfigBuilder::new()
            .base_dose_uc_cm2(0.0)
            .threshold_uc_cm2(400.0)
            .max_correction_ratio(3.0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "base_dose_uc_cm2",
                ..
            })
        ));
    }

    #[test]
    fn deserialized_configs_validate_after_the_fact() {
        let config: CorrectionConfig = toml::from_str(
            r#"
            base_dose_uc_cm2 = 400.0
            threshold_uc_cm2 = 380.0
            max_correction_ratio = 3.0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.shot_pitch_multiple, 1);
    }
}
