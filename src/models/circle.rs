//! Circle model fit by linear least squares.

use nalgebra::{DMatrix, DVector, Vector2, SVD};

use crate::errors::FittingError;
use crate::models::Model;
use crate::types::DataMatrix;

/// Iteration cap for the least-squares decomposition.
const LSTSQ_MAX_ITERS: usize = 250;

/// Relative singular-value cutoff below which the design matrix is treated
/// as rank deficient (collinear or coincident sample points).
const RANK_EPS: f64 = 1e-10;

/// Circle in the plane, parameterized by center and radius.
///
/// Fitting uses the algebraic form: a point (x, y) on the circle satisfies
/// `x·c0 + y·c1 + c2 = -(x² + y²)` for coefficients encoding the center and
/// radius, which makes the fit a linear least-squares problem.
#[derive(Clone, Debug)]
pub struct Circle {
    pub center: Vector2<f64>,
    pub radius: f64,
}

impl Model for Circle {
    const MIN_SAMPLE_SIZE: usize = 3;

    fn fit(points: &DataMatrix, weights: Option<&DVector<f64>>) -> Result<Self, FittingError> {
        let n = points.nrows();
        if n < Self::MIN_SAMPLE_SIZE {
            return Err(FittingError::InsufficientPoints {
                needed: Self::MIN_SAMPLE_SIZE,
                got: n,
            });
        }
        if points.ncols() != 2 {
            return Err(FittingError::DimensionMismatch {
                expected: 2,
                got: points.ncols(),
            });
        }
        if let Some(w) = weights {
            if w.len() != n {
                return Err(FittingError::WeightCountMismatch {
                    expected: n,
                    got: w.len(),
                });
            }
            let nonzero = w.iter().filter(|v| **v != 0.0).count();
            if nonzero < Self::MIN_SAMPLE_SIZE {
                return Err(FittingError::InsufficientWeights {
                    needed: Self::MIN_SAMPLE_SIZE,
                    got: nonzero,
                });
            }
        }

        let mut design = DMatrix::zeros(n, 3);
        let mut rhs = DVector::zeros(n);
        for i in 0..n {
            let (x, y) = (points[(i, 0)], points[(i, 1)]);
            let w = weights.map_or(1.0, |w| w[i]);
            design[(i, 0)] = w * x;
            design[(i, 1)] = w * y;
            design[(i, 2)] = w;
            rhs[i] = -w * (x * x + y * y);
        }

        let svd = SVD::try_new(design, true, true, f64::EPSILON, LSTSQ_MAX_ITERS).ok_or(
            FittingError::DegenerateSample("least-squares decomposition did not converge"),
        )?;
        let s_max = svd.singular_values.max();
        let s_min = svd.singular_values.min();
        if s_max <= 0.0 || s_min < RANK_EPS * s_max {
            return Err(FittingError::DegenerateSample(
                "sample points are collinear or coincident",
            ));
        }
        let sol = svd
            .solve(&rhs, f64::EPSILON)
            .map_err(|_| FittingError::DegenerateSample("least-squares solve failed"))?;

        let center = Vector2::new(-0.5 * sol[0], -0.5 * sol[1]);
        let radius_sq = center.norm_squared() - sol[2];
        if radius_sq <= 0.0 {
            return Err(FittingError::DegenerateSample(
                "sample admits no real radius",
            ));
        }

        Ok(Circle {
            center,
            radius: radius_sq.sqrt(),
        })
    }

    fn distances(&self, points: &DataMatrix) -> DVector<f64> {
        debug_assert_eq!(points.ncols(), 2);
        DVector::from_iterator(
            points.nrows(),
            (0..points.nrows()).map(|i| {
                let dx = points[(i, 0)] - self.center.x;
                let dy = points[(i, 1)] - self.center.y;
                ((dx * dx + dy * dy).sqrt() - self.radius).abs()
            }),
        )
    }
}
