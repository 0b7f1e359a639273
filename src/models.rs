//! Parametric geometric models fit from minimal samples.
//!
//! A model variant implements the [`Model`] capability: it knows its minimal
//! sample size, can be fit from a point set (optionally weighted), and reports
//! a per-point residual. New variants plug into the hypothesis pipeline by
//! implementing this trait.

use nalgebra::DVector;

use crate::errors::FittingError;
use crate::types::DataMatrix;

pub mod circle;

pub use circle::Circle;

/// Capability contract for parametric geometric models.
pub trait Model: Sized {
    /// Smallest number of points that uniquely determines the model.
    const MIN_SAMPLE_SIZE: usize;

    /// Fit the model to `points` (one point per row).
    ///
    /// When `weights` is given it must have one entry per point; rows are
    /// scaled by their weight before solving, and at least
    /// [`Self::MIN_SAMPLE_SIZE`] weights must be nonzero.
    fn fit(points: &DataMatrix, weights: Option<&DVector<f64>>) -> Result<Self, FittingError>;

    /// Per-point residual of `points` with respect to this model.
    fn distances(&self, points: &DataMatrix) -> DVector<f64>;
}
