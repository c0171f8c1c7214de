//! # Core Module
//!
//! This module provides the fundamental building blocks for proximity-effect
//! correction: the exposure data model, the point-spread-function mathematics,
//! and the file formats exchanged with the simulator and downstream tools.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the correction problem:
//!
//! - **Exposure Representation** ([`models`]) - Patterns, flattened features,
//!   shots, and the machine profile
//! - **PSF Mathematics** ([`psf`]) - The two-Gaussian kernel, nonlinear fitting,
//!   and containment-radius integration
//! - **File I/O** ([`io`]) - Simulator radial-dose tables, BEAMER-compatible PSF
//!   export, and reproducible run reports
//!
//! ## Key Capabilities
//!
//! - **Closed pattern algebra** with exhaustive matching, so shot-count and
//!   rank-classification rules can never silently no-op for an unhandled shape
//! - **Deterministic feature flattening** of composite and array patterns into
//!   leaf exposure units addressed by stable IDs
//! - **Bounded nonlinear least-squares** PSF fitting with box constraints and an
//!   internal iteration budget
//! - **Byte-stable interchange formats** for third-party proximity-correction
//!   tools

pub mod io;
pub mod models;
pub mod psf;
