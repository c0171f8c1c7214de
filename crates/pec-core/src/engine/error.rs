use crate::core::psf::fit::FitError;
use crate::engine::config::ConfigError;
use crate::engine::grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Shot grid generation failed: {source}")]
    Grid {
        #[from]
        source: GridError,
    },

    #[error("PSF fit failed: {source}")]
    Fit {
        #[from]
        source: FitError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("No features to correct: the pattern set is empty")]
    EmptyPatternSet,

    #[error("Degenerate PSF parameters: {reason}")]
    DegeneratePsf { reason: String },
}
