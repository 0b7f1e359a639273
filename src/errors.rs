//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised when a model cannot be fit from a given sample.
///
/// These are propagated through the hypothesis pipeline as `Err` items of the
/// lazy sequence; they are never silently skipped.
#[derive(Debug, Error)]
pub enum FittingError {
    /// Fewer points than the model's minimal sample size.
    #[error("at least {needed} points are needed, got {got}")]
    InsufficientPoints { needed: usize, got: usize },
    /// Fewer points with nonzero weight than the minimal sample size.
    #[error("at least {needed} points with nonzero weight are needed, got {got}")]
    InsufficientWeights { needed: usize, got: usize },
    /// Points do not have the dimensionality the model expects.
    #[error("points must be {expected}-dimensional, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// Weight vector length does not match the point count.
    #[error("weight vector has length {got}, expected {expected}")]
    WeightCountMismatch { expected: usize, got: usize },
    /// The sample admits no model (e.g. collinear points for a circle).
    #[error("degenerate sample: {0}")]
    DegenerateSample(&'static str),
}

/// The truncated decomposition exhausted its tolerance ladder without
/// converging.
#[derive(Debug, Error)]
#[error("truncated decomposition failed to converge with tolerance {tolerance}")]
pub struct ConvergenceError {
    /// Last tolerance attempted before giving up.
    pub tolerance: f64,
}
