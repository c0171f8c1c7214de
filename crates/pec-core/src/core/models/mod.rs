//! # Exposure Data Models
//!
//! Data structures describing what gets exposed and on which machine:
//!
//! - [`pattern`] - The closed pattern algebra (square, line, array, composite)
//! - [`feature`] - Leaf exposure units produced by flattening patterns
//! - [`layout`] - The feature container with stable iteration order
//! - [`shot`] - Discrete machine exposure events with topological ranks
//! - [`machine`] - The immutable machine profile (grid, clock ceiling, current)
//! - [`ids`] - Slot-map key types for features

pub mod feature;
pub mod ids;
pub mod layout;
pub mod machine;
pub mod pattern;
pub mod shot;
