//! # Workflows Module
//!
//! The public, highest-level API of the library. Each workflow ties the
//! [`crate::core`] models and [`crate::engine`] pipeline together into one
//! complete procedure with logging and progress reporting:
//!
//! - [`fit`] - Fit the two-Gaussian PSF from simulator radial dose samples
//! - [`correct`] - Run the full proximity-correction pipeline over a layout
//!
//! Workflows hold no state between calls; callers own every input and output.

pub mod correct;
pub mod fit;
