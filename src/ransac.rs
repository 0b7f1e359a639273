//! Lazy hypothesis-generation pipeline.
//!
//! Composes a sampler and a model capability into a pull-based sequence of
//! (fitted model, inlier mask) pairs. Every stage is lazy and single-pass: a
//! consumer that stops pulling short-circuits all remaining sampling and
//! fitting work. Fit failures are yielded as `Err` items, never skipped.

use crate::errors::FittingError;
use crate::models::Model;
use crate::samplers::Sampler;
use crate::types::{DataMatrix, InlierMask};

/// Lazily pair each sampler-produced sample with a model fit on its points.
pub fn model_generator<'a, M, S>(
    data: &'a DataMatrix,
    sampler: &'a mut S,
) -> impl Iterator<Item = Result<M, FittingError>> + 'a
where
    M: Model + 'a,
    S: Sampler,
{
    sampler.generate(data, M::MIN_SAMPLE_SIZE).map(move |sample| {
        let points = data.select_rows(sample.iter());
        M::fit(&points, None)
    })
}

/// Inlier mask of `data` under `model`: `true` where the residual is at most
/// `threshold` (inclusive).
pub fn inliers<M: Model>(model: &M, data: &DataMatrix, threshold: f64) -> InlierMask {
    model
        .distances(data)
        .iter()
        .map(|&r| r <= threshold)
        .collect()
}

/// Lazy sequence of (model, inlier mask) hypothesis pairs.
pub fn ransac_generator<'a, M, S>(
    data: &'a DataMatrix,
    sampler: &'a mut S,
    threshold: f64,
) -> impl Iterator<Item = Result<(M, InlierMask), FittingError>> + 'a
where
    M: Model + 'a,
    S: Sampler,
{
    model_generator::<M, S>(data, sampler).map(move |fit| {
        fit.map(|model| {
            let mask = inliers(&model, data, threshold);
            (model, mask)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Circle;
    use crate::samplers::UniformSampler;
    use nalgebra::DMatrix;

    fn unit_circle(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, 2, |i, j| {
            let angle = (i as f64) * 2.0 * std::f64::consts::PI / (n as f64);
            if j == 0 {
                angle.cos()
            } else {
                angle.sin()
            }
        })
    }

    #[test]
    fn model_generator_fits_every_sample() {
        let data = unit_circle(12);
        let mut sampler = UniformSampler::from_seed(8, 5);

        let mut count = 0;
        for fit in model_generator::<Circle, _>(&data, &mut sampler) {
            let circle = fit.unwrap();
            assert!((circle.radius - 1.0).abs() < 1e-6);
            assert!(circle.center.norm() < 1e-6);
            count += 1;
        }
        assert_eq!(count, 8);
    }

    #[test]
    fn fit_failures_are_propagated_not_skipped() {
        // Three collinear points with sample size three: every sample is the
        // whole (degenerate) set.
        let data = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
        let mut sampler = UniformSampler::from_seed(4, 21);

        let results: Vec<_> = model_generator::<Circle, _>(&data, &mut sampler).collect();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| matches!(
            r,
            Err(FittingError::DegenerateSample(_))
        )));
    }

    #[test]
    fn inlier_threshold_is_inclusive() {
        let circle = Circle {
            center: nalgebra::Vector2::zeros(),
            radius: 1.0,
        };
        // First point sits at residual exactly equal to the threshold.
        let probe = DMatrix::from_row_slice(2, 2, &[1.5, 0.0, 2.5, 0.0]);
        let mask = inliers(&circle, &probe, 0.5);
        assert_eq!(mask, vec![true, false]);
    }

    #[test]
    fn ransac_generator_pairs_models_with_masks() {
        let data = unit_circle(10);
        let mut sampler = UniformSampler::from_seed(6, 17);

        for hypothesis in ransac_generator::<Circle, _>(&data, &mut sampler, 1e-6) {
            let (circle, mask) = hypothesis.unwrap();
            assert!((circle.radius - 1.0).abs() < 1e-6);
            assert_eq!(mask.len(), 10);
            assert!(mask.iter().all(|&m| m));
        }
    }

    #[test]
    fn consumer_can_stop_pulling_early() {
        let data = unit_circle(10);
        let mut sampler = UniformSampler::from_seed(1_000_000, 2);

        let taken: Vec<_> = ransac_generator::<Circle, _>(&data, &mut sampler, 1e-6)
            .take(3)
            .collect();
        assert_eq!(taken.len(), 3);
    }
}
