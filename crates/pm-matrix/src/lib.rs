//! `pm-matrix` - Dense matrix type with pluggable multiplication backends.
//!
//! This crate provides:
//! - A `Matrix` type owning a row-major `f64` buffer
//! - A `MultiplyBackend` trait for pluggable multiplication strategies
//! - A sequential `ReferenceBackend` used as the correctness baseline

pub mod backend;
pub mod error;
pub mod matrix;
pub mod reference;

// Re-export primary types at the crate root for convenience.
pub use backend::MultiplyBackend;
pub use error::{MatrixError, Result};
pub use matrix::Matrix;
pub use reference::{dot_cell, ReferenceBackend};
