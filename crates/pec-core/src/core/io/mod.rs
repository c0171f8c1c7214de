//! # I/O Module
//!
//! File formats the engine exchanges with the outside world:
//!
//! - [`radial`] - The simulator's radial energy-deposition table (CSV with
//!   `#` comments and a header row)
//! - [`beamer`] - The BEAMER-compatible two-Gaussian PSF interchange record
//! - [`report`] - The reproducible correction-run report (TOML)
//! - [`traits`] - The common read/write interface shared by the text formats
//!
//! Formats with downstream consumers ([`beamer`]) are byte-stable: the exact
//! text layout is part of the contract and covered by regression tests.

pub mod beamer;
pub mod radial;
pub mod report;
pub mod traits;
