//! Core shared types for the hypothesis-sampling and factorization pipeline.

use nalgebra::DMatrix;

/// Dynamic matrix of `f64` holding one point per row.
///
/// Samplers and models consume an n×d `DataMatrix`; the incremental
/// factorization operates on matrices of the same representation.
pub type DataMatrix = DMatrix<f64>;

/// Minimal sample: distinct indices into the rows of a [`DataMatrix`].
pub type Sample = Vec<usize>;

/// Boolean membership vector marking which points a hypothesis explains
/// within a distance threshold.
pub type InlierMask = Vec<bool>;
