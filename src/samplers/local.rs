//! Adaptive sampler drawing spatially local samples around seed points.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};

use crate::samplers::Sampler;
use crate::types::{DataMatrix, Sample};
use crate::utils::has_duplicates;

/// Inner retries for drawing a duplicate-free sample around one seed.
const MAX_SEED_RETRIES: usize = 100;

/// Total attempt budget, as a multiple of the requested sample count.
const ATTEMPT_BUDGET_FACTOR: usize = 100;

/// Adaptive local sampler biased toward least-selected points.
///
/// Each candidate sample starts from a seed index drawn with probability
/// proportional to `max(d) - d[j]`, where `d` counts how often each point has
/// appeared in previously yielded samples. The remaining indices are drawn
/// from a Gaussian kernel `exp(-‖x_i - x_j‖² / σ²)` around the seed, so
/// samples stay spatially local.
///
/// A generate run stops after the configured number of samples or after
/// `100 × n_samples` total attempts, whichever comes first; yielding fewer
/// samples than requested is a normal outcome, not an error.
pub struct AdaptiveLocalSampler {
    var: f64,
    n_samples: usize,
    distribution: Vec<f64>,
    rng: rand::rngs::StdRng,
}

impl AdaptiveLocalSampler {
    /// Construct a sampler with kernel bandwidth `sigma`, producing up to
    /// `n_samples` samples per generate run.
    pub fn new(sigma: f64, n_samples: usize) -> Self {
        Self {
            var: sigma * sigma,
            n_samples,
            distribution: Vec::new(),
            rng: rand::rngs::StdRng::from_entropy(),
        }
    }

    /// Construct a sampler from a fixed seed (primarily for tests).
    pub fn from_seed(sigma: f64, n_samples: usize, seed: u64) -> Self {
        Self {
            var: sigma * sigma,
            n_samples,
            distribution: Vec::new(),
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }

    /// Per-point selection counts accumulated over the current generate run.
    pub fn distribution(&self) -> &[f64] {
        &self.distribution
    }

    /// Draw a seed index with probability proportional to `max(d) - d[j]`.
    fn draw_seed(&mut self) -> usize {
        let max = self
            .distribution
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = self.distribution.iter().map(|&d| max - d).collect();
        match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(&mut self.rng),
            // All counts equal (e.g. the first draw of a run): the bias is
            // vacuous, so fall back to a uniform draw.
            Err(_) => self.rng.gen_range(0..self.distribution.len()),
        }
    }
}

impl Sampler for AdaptiveLocalSampler {
    fn generate<'a>(
        &'a mut self,
        data: &'a DataMatrix,
        sample_size: usize,
    ) -> Box<dyn Iterator<Item = Sample> + 'a> {
        let n = data.nrows();
        if sample_size == 0 || n < sample_size {
            return Box::new(std::iter::empty());
        }

        self.distribution = vec![0.0; n];
        let budget = ATTEMPT_BUDGET_FACTOR * self.n_samples;
        let mut yielded = 0usize;
        let mut attempts = 0usize;

        Box::new(std::iter::from_fn(move || {
            while yielded < self.n_samples && attempts < budget {
                attempts += 1;
                let seed = self.draw_seed();

                // Gaussian kernel around the seed point.
                let weights: Vec<f64> = (0..n)
                    .map(|i| {
                        let mut sq_dist = 0.0;
                        for c in 0..data.ncols() {
                            let diff = data[(i, c)] - data[(seed, c)];
                            sq_dist += diff * diff;
                        }
                        (-sq_dist / self.var).exp()
                    })
                    .collect();
                let Ok(kernel) = WeightedIndex::new(&weights) else {
                    continue;
                };

                let mut sample = vec![0usize; sample_size];
                let mut distinct = false;
                for _ in 0..MAX_SEED_RETRIES {
                    for slot in sample[..sample_size - 1].iter_mut() {
                        *slot = kernel.sample(&mut self.rng);
                    }
                    sample[sample_size - 1] = seed;
                    if !has_duplicates(&sample) {
                        distinct = true;
                        break;
                    }
                }
                if !distinct {
                    // This seed keeps producing duplicates; abandon it and
                    // charge the attempt against the budget.
                    continue;
                }

                for &idx in &sample {
                    self.distribution[idx] += 1.0;
                }
                yielded += 1;
                return Some(sample);
            }
            None
        }))
    }
}
