//! Numeric primitives: norms, error metrics, and decomposition wrappers.
//!
//! Dense and sparse matrices expose the same operation names through the
//! [`MatrixNorms`] trait; the error metrics are generic over it. The
//! decomposition wrappers adapt external primitives: nalgebra's exact SVD for
//! dense matrices and `single-svdlib`'s Lanczos routine for truncated sparse
//! decompositions, the latter retried over an escalating tolerance ladder.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CsrMatrix;
use single_svdlib::lanczos::svd_las2;

use crate::errors::ConvergenceError;

/// Iteration cap for exact dense decompositions.
const FULL_SVD_MAX_ITERS: usize = 1000;

/// Largest tolerance tried before the truncated decomposition gives up.
const TOLERANCE_CEILING: f64 = 1e-3;

/// Norm and support operations shared by dense and sparse matrices.
pub trait MatrixNorms: Sized {
    /// Frobenius norm.
    fn frobenius_norm(&self) -> f64;

    /// Number of explicitly nonzero entries.
    fn count_nonzero(&self) -> usize;

    /// Copy of the matrix with every entry scaled by `factor`.
    fn scaled(&self, factor: f64) -> Self;

    /// Frobenius norm of the difference `self - other`.
    fn diff_norm(&self, other: &Self) -> f64;
}

impl MatrixNorms for DMatrix<f64> {
    fn frobenius_norm(&self) -> f64 {
        self.norm()
    }

    fn count_nonzero(&self) -> usize {
        self.iter().filter(|v| **v != 0.0).count()
    }

    fn scaled(&self, factor: f64) -> Self {
        self * factor
    }

    fn diff_norm(&self, other: &Self) -> f64 {
        (self - other).norm()
    }
}

impl MatrixNorms for CsrMatrix<f64> {
    fn frobenius_norm(&self) -> f64 {
        self.values().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    fn count_nonzero(&self) -> usize {
        self.nnz()
    }

    fn scaled(&self, factor: f64) -> Self {
        let mut out = self.clone();
        for v in out.values_mut() {
            *v *= factor;
        }
        out
    }

    fn diff_norm(&self, other: &Self) -> f64 {
        (self - other).frobenius_norm()
    }
}

/// Frobenius-norm error of `approximation` relative to `reference`.
pub fn relative_error<M: MatrixNorms>(reference: &M, approximation: &M) -> f64 {
    reference.diff_norm(approximation) / reference.frobenius_norm()
}

/// Scale-invariant error: each operand is scaled by its own norm before
/// differencing.
pub fn normalized_error<M: MatrixNorms>(a: &M, b: &M) -> f64 {
    let norm_a = a.frobenius_norm();
    let norm_b = b.frobenius_norm();
    a.scaled(1.0 / norm_a).diff_norm(&b.scaled(1.0 / norm_b))
}

/// Exact thin SVD of a dense matrix: `(U, S, Vt)` with `A ≈ U·diag(S)·Vt`.
///
/// Returns `None` when the decomposition does not converge.
pub fn full_svd(matrix: &DMatrix<f64>) -> Option<(DMatrix<f64>, DVector<f64>, DMatrix<f64>)> {
    let svd = nalgebra::SVD::try_new(
        matrix.clone(),
        true,
        true,
        f64::EPSILON,
        FULL_SVD_MAX_ITERS,
    )?;
    let u = svd.u?;
    let vt = svd.v_t?;
    Some((u, svd.singular_values, vt))
}

/// Result of a truncated decomposition: `U` (n×k), `S` (k), `Vt` (k×m).
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    pub u: DMatrix<f64>,
    pub s: DVector<f64>,
    pub vt: DMatrix<f64>,
}

/// Rank-`k` truncated SVD of a sparse matrix via the Lanczos primitive.
///
/// The underlying routine is retried with an escalating tolerance: 0, then
/// 1e-10, then ×10 per attempt up to 1e-3. Exhausting the ladder yields a
/// [`ConvergenceError`].
pub fn truncated_svd(matrix: &CsrMatrix<f64>, k: usize) -> Result<TruncatedSvd, ConvergenceError> {
    let iterations = matrix.nrows().max(matrix.ncols());
    let mut tolerance = 0.0_f64;
    loop {
        if tolerance > TOLERANCE_CEILING {
            return Err(ConvergenceError { tolerance });
        }
        match svd_las2(matrix, k, iterations, &[-1.0e-30, 1.0e30], tolerance, 42) {
            Ok(rec) => {
                let (ut_rows, ut_cols) = rec.ut.dim();
                let u = DMatrix::from_fn(ut_cols, ut_rows, |i, j| rec.ut[[j, i]]);
                let s = DVector::from_iterator(rec.s.len(), rec.s.iter().cloned());
                let (vt_rows, vt_cols) = rec.vt.dim();
                let vt = DMatrix::from_fn(vt_rows, vt_cols, |i, j| rec.vt[[i, j]]);
                return Ok(TruncatedSvd { u, s, vt });
            }
            Err(err) => {
                log::debug!("truncated SVD failed with tolerance {tolerance}: {err}");
                tolerance = if tolerance == 0.0 { 1e-10 } else { tolerance * 10.0 };
            }
        }
    }
}
