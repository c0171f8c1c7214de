//! # PEC Core Library
//!
//! A proximity-effect correction engine for electron-beam lithography: it fits a
//! two-Gaussian point-spread function (PSF) to simulated radial energy-deposition
//! data, rasterizes exposure patterns into machine shot grids, converts areal dose
//! into realizable shot timing, and solves for per-feature dose corrections that
//! compensate for backscatter from neighboring exposures.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Pattern`,
//!   `ExposureLayout`, `Shot`, `MachineProfile`), pure mathematical representations
//!   of the PSF (`kernel`, `fit`, `containment`), and I/O utilities (radial-table
//!   parsing, BEAMER-compatible PSF export, run reports).
//!
//! - **[`engine`]: The Logic Core.** This layer implements the correction pipeline:
//!   shot-grid generation, dose/shot conversion under hardware rate ceilings,
//!   pairwise background estimation, and the bounded dose-correction solve. It also
//!   owns solver configuration, state tracking, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It
//!   ties `engine` and `core` together to execute complete procedures: fitting a
//!   PSF from a simulator table, and correcting a full exposure layout end to end.

pub mod core;
pub mod engine;
pub mod workflows;
