//! Incrementally maintained rank-truncated SVD factorization.
//!
//! [`IncrementalSvd`] tracks `A ≈ U·diag(S)·Vt` for a conceptual matrix that
//! changes by rank-one contributions: [`IncrementalSvd::update`] incorporates
//! `a·bᵗ`, [`IncrementalSvd::remove_column`] cancels the contribution of one
//! standard-basis column. Both operate through a small `(r+1)×(r+1)` core
//! decomposition instead of recomputing the factorization of the full matrix.
//!
//! Decomposition failure is fail-soft: the factorization enters a terminal
//! [`Factors::Failed`] state, a diagnostic is logged, and every subsequent
//! mutation is a silent no-op. This suits long-running consumers where losing
//! one update is cheaper than aborting the surrounding loop.

use nalgebra::{DMatrix, DVector, SVD};

use crate::numeric::full_svd;

/// Iteration cap for the small core decompositions.
const CORE_SVD_MAX_ITERS: usize = 1000;

/// Factorization state: usable factors, or the terminal failed state.
#[derive(Clone, Debug)]
pub enum Factors {
    /// Factors `U` (n×r), `S` (r non-negative values), `Vt` (r×m).
    Active {
        u: DMatrix<f64>,
        s: DVector<f64>,
        vt: DMatrix<f64>,
    },
    /// Terminal state after an unrecoverable decomposition failure.
    Failed,
}

/// Rank-truncated SVD maintained under rank-one column updates.
pub struct IncrementalSvd {
    shape: (usize, usize),
    state: Factors,
}

impl IncrementalSvd {
    /// Build the factorization from an initial dense matrix.
    ///
    /// A failed initial decomposition puts the factorization straight into
    /// the terminal failed state.
    pub fn new(matrix: &DMatrix<f64>) -> Self {
        let shape = (matrix.nrows(), matrix.ncols());
        let state = match full_svd(matrix) {
            Some((u, s, vt)) => Factors::Active { u, s, vt },
            None => {
                log::warn!("initial decomposition did not converge; factorization disabled");
                Factors::Failed
            }
        };
        Self { shape, state }
    }

    /// Shape of the conceptual matrix being tracked.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Rank bound the factorization is trimmed back to after each mutation.
    pub fn target_rank(&self) -> usize {
        self.shape.0.min(self.shape.1)
    }

    /// Whether the factorization has entered the terminal failed state.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, Factors::Failed)
    }

    /// Current `(U, S, Vt)` snapshot, or `None` in the failed state.
    ///
    /// Valid at any point, including between mutations.
    pub fn factors(&self) -> Option<(&DMatrix<f64>, &DVector<f64>, &DMatrix<f64>)> {
        match &self.state {
            Factors::Active { u, s, vt } => Some((u, s, vt)),
            Factors::Failed => None,
        }
    }

    /// Dense reconstruction `U·diag(S)·Vt`, or `None` in the failed state.
    pub fn reconstruct(&self) -> Option<DMatrix<f64>> {
        self.factors()
            .map(|(u, s, vt)| u * DMatrix::from_diagonal(s) * vt)
    }

    /// Incorporate the rank-one contribution `a·bᵗ`.
    ///
    /// `a` and `b` are projected onto the current column and row spaces; the
    /// orthogonal-complement directions extend the bases when the rank grows,
    /// and the rotation comes from an exact decomposition of the small
    /// augmented core. The factorization is trimmed back to the target rank
    /// afterwards.
    pub fn update(&mut self, a: &DVector<f64>, b: &DVector<f64>) {
        let Factors::Active { u, s, vt } = &self.state else {
            return;
        };
        debug_assert_eq!(a.len(), self.shape.0);
        debug_assert_eq!(b.len(), self.shape.1);

        let m = u.transpose() * a;
        let mut p = a - u * &m;
        let r_a = p.norm();
        // A zero residual means `a` already lies in the column space; leave
        // the direction as a zero vector rather than dividing by zero.
        if r_a > 0.0 {
            p /= r_a;
        }

        let n_coef = vt * b;
        let mut q = b - vt.transpose() * &n_coef;
        let r_b = q.norm();
        if r_b > 0.0 {
            q /= r_b;
        }

        let u_a = append(&m, r_a);
        let v_b = append(&n_coef, r_b);
        let rank = s.len();
        let mut core = DMatrix::zeros(rank + 1, rank + 1);
        for i in 0..rank {
            core[(i, i)] = s[i];
        }
        core += &u_a * v_b.transpose();

        self.apply_core(p, q, core);
    }

    /// Cancel the contribution currently attributed to column `idx`.
    ///
    /// Structurally the same as [`Self::update`], except the row-space
    /// residual is computed against `Vt[:, idx]` directly and the core takes
    /// the identity-minus-outer-product form, so the net effect removes the
    /// column's influence instead of adding new influence.
    pub fn remove_column(&mut self, idx: usize) {
        let Factors::Active { s, vt, .. } = &self.state else {
            return;
        };
        debug_assert!(idx < self.shape.1);

        let p = DVector::zeros(self.shape.0);

        let n_coef = vt.column(idx).into_owned();
        let mut e = DVector::zeros(self.shape.1);
        e[idx] = 1.0;
        let mut q = e - vt.transpose() * &n_coef;
        let r_b = q.norm();
        if r_b > 0.0 {
            q /= r_b;
        }

        let u_a = append(&n_coef, 0.0);
        let v_b = append(&n_coef, r_b);
        let rank = s.len();
        let mut diag = DMatrix::zeros(rank + 1, rank + 1);
        for i in 0..rank {
            diag[(i, i)] = s[i];
        }
        let core = diag * (DMatrix::identity(rank + 1, rank + 1) - &u_a * v_b.transpose());

        self.apply_core(p, q, core);
    }

    /// Truncate the factors to the target rank.
    ///
    /// Re-applied after every mutation so the representation never exceeds
    /// `min(n, m)` regardless of transient growth.
    pub fn trim(&mut self) {
        let target = self.target_rank();
        let Factors::Active { u, s, vt } = &mut self.state else {
            return;
        };
        if s.len() > target {
            *u = u.columns(0, target).into_owned();
            *s = s.rows(0, target).into_owned();
            *vt = vt.rows(0, target).into_owned();
        }
    }

    /// Decompose the augmented core and rotate the factors, extending the
    /// bases with `p` and `q` when the singular count grows.
    fn apply_core(&mut self, p: DVector<f64>, q: DVector<f64>, core: DMatrix<f64>) {
        // Park the factorization in the failed state; it is restored below
        // once the core decomposition has succeeded.
        let state = std::mem::replace(&mut self.state, Factors::Failed);
        let Factors::Active { mut u, s, mut vt } = state else {
            return;
        };

        let Some(core_svd) = SVD::try_new(core, true, true, f64::EPSILON, CORE_SVD_MAX_ITERS)
        else {
            log::warn!("core decomposition did not converge; factorization disabled");
            return;
        };
        let (Some(core_u), Some(core_vt)) = (core_svd.u, core_svd.v_t) else {
            log::warn!("core decomposition returned no factors; factorization disabled");
            return;
        };
        let s_new = core_svd.singular_values;

        if s_new.len() > s.len() {
            let cols = u.ncols();
            u = u.insert_column(cols, 0.0);
            u.set_column(cols, &p);

            let rows = vt.nrows();
            vt = vt.insert_row(rows, 0.0);
            vt.set_row(rows, &q.transpose());
        }

        self.state = Factors::Active {
            u: u * core_u,
            s: s_new,
            vt: core_vt * vt,
        };
        self.trim();
    }
}

/// `v` with `value` appended as a final entry.
fn append(v: &DVector<f64>, value: f64) -> DVector<f64> {
    let len = v.len();
    let mut out = v.clone().insert_row(len, 0.0);
    out[len] = value;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_matrix() -> DMatrix<f64> {
        DMatrix::from_row_slice(
            3,
            4,
            &[
                1.0, 2.0, 0.5, -1.0, //
                0.0, -1.0, 3.0, 2.0, //
                2.0, 0.0, 1.0, 0.5,
            ],
        )
    }

    #[test]
    fn construction_round_trips_the_input() {
        let a = sample_matrix();
        let mut svd = IncrementalSvd::new(&a);
        svd.trim();

        assert!(!svd.is_failed());
        assert_relative_eq!(svd.reconstruct().unwrap(), a, epsilon = 1e-9);

        let (u, s, vt) = svd.factors().unwrap();
        assert_eq!(u.shape(), (3, 3));
        assert_eq!(s.len(), 3);
        assert_eq!(vt.shape(), (3, 4));
    }

    #[test]
    fn update_adds_an_outer_product() {
        let a = sample_matrix();
        let mut svd = IncrementalSvd::new(&a);

        let col = DVector::from_vec(vec![0.3, -1.2, 0.8]);
        let row = DVector::from_vec(vec![1.0, 0.0, -0.5, 2.0]);
        svd.update(&col, &row);

        let expected = &a + &col * row.transpose();
        assert_relative_eq!(svd.reconstruct().unwrap(), expected, epsilon = 1e-8);
    }

    #[test]
    fn trim_bounds_the_representation() {
        let a = sample_matrix();
        let mut svd = IncrementalSvd::new(&a);
        let target = svd.target_rank();

        for step in 0..4 {
            let col = DVector::from_fn(3, |i, _| (i + step) as f64 * 0.25 - 0.5);
            let row = DVector::from_fn(4, |i, _| (i as f64) - (step as f64) * 0.1);
            svd.update(&col, &row);

            let (u, s, vt) = svd.factors().unwrap();
            assert!(u.ncols() <= target);
            assert!(s.len() <= target);
            assert!(vt.nrows() <= target);
        }
    }

    #[test]
    fn remove_column_cancels_its_contribution() {
        let a = sample_matrix();
        let mut svd = IncrementalSvd::new(&a);
        svd.remove_column(1);

        let mut expected = a.clone();
        expected.set_column(1, &DVector::zeros(3));
        assert_relative_eq!(svd.reconstruct().unwrap(), expected, epsilon = 1e-8);
    }

    #[test]
    fn re_adding_a_removed_column_restores_the_matrix() {
        let a = sample_matrix();
        let mut svd = IncrementalSvd::new(&a);

        let original = a.column(2).into_owned();
        svd.remove_column(2);

        let mut basis = DVector::zeros(4);
        basis[2] = 1.0;
        svd.update(&original, &basis);

        assert_relative_eq!(svd.reconstruct().unwrap(), a, epsilon = 1e-6);
    }

    #[test]
    fn identity_scenario() {
        let eye = DMatrix::<f64>::identity(4, 4);
        let mut svd = IncrementalSvd::new(&eye);

        let (_, s, _) = svd.factors().unwrap();
        assert!(s.iter().all(|&v| (v - 1.0).abs() < 1e-12));

        svd.remove_column(0);
        svd.trim();

        let mut expected = eye.clone();
        expected.set_column(0, &DVector::zeros(4));
        assert_relative_eq!(svd.reconstruct().unwrap(), expected, epsilon = 1e-9);

        // One singular value collapses to zero; the others stay at one.
        let (_, s, _) = svd.factors().unwrap();
        let mut values: Vec<f64> = s.iter().cloned().collect();
        values.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_relative_eq!(values[2], 1.0, epsilon = 1e-9);
        assert!(values[3].abs() < 1e-9);
    }

    #[test]
    fn failed_state_is_terminal_and_mutations_are_no_ops() {
        let mut svd = IncrementalSvd {
            shape: (3, 4),
            state: Factors::Failed,
        };

        assert!(svd.is_failed());
        assert!(svd.factors().is_none());
        assert!(svd.reconstruct().is_none());

        svd.update(
            &DVector::from_element(3, 1.0),
            &DVector::from_element(4, 1.0),
        );
        svd.remove_column(0);
        svd.trim();

        assert!(svd.is_failed());
        assert!(svd.factors().is_none());
        assert_eq!(svd.shape(), (3, 4));
    }

    #[test]
    fn updates_with_in_space_vectors_are_handled() {
        // The update directions already lie in the tracked spaces, so both
        // residual norms collapse to numerical noise.
        let a = sample_matrix();
        let mut svd = IncrementalSvd::new(&a);

        let col = a.column(0).into_owned();
        let mut basis = DVector::zeros(4);
        basis[0] = 1.0;
        svd.update(&col, &basis);

        let expected = &a + &col * basis.transpose();
        assert!(!svd.is_failed());
        assert_relative_eq!(svd.reconstruct().unwrap(), expected, epsilon = 1e-8);
    }
}
