//! # Engine Module
//!
//! The correction pipeline itself. Where [`crate::core`] holds the stateless
//! models and PSF mathematics, this layer turns a layout plus a machine
//! profile into corrected shot doses:
//!
//! - **Shot-grid generation** ([`grid`]) - Rasterizing features onto the
//!   machine's exposure lattice with topological rank classification
//! - **Dose conversion** ([`dose`]) - The areal-dose / clock-frequency /
//!   electron-count identities, with hardware rate ceilings surfaced as
//!   inspectable clamp results
//! - **Background estimation** ([`background`]) - The pairwise mean-field
//!   backscatter dose every feature receives from its neighbors
//! - **Dose solving** ([`correction`]) - The bounded per-feature correction
//!   factors driving total dose toward the development threshold
//! - **Solver state** ([`state`]) - Stage tracking and result tables
//! - **Configuration** ([`config`]) - Validated solver settings
//! - **Progress** ([`progress`]) - Callback-based stage reporting
//! - **Errors** ([`error`]) - The engine-level error taxonomy
//!
//! Every stage is a synchronous, deterministic function of explicit inputs;
//! re-running any stage from scratch is always safe.

pub mod background;
pub mod config;
pub mod correction;
pub mod dose;
pub mod error;
pub mod grid;
pub mod progress;
pub mod state;
