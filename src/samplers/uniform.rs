//! Uniform random sampler drawing minimal samples without replacement.

use crate::samplers::Sampler;
use crate::types::{DataMatrix, Sample};
use crate::utils::UniformRandomGenerator;

/// Uniform random sampler drawing a fixed number of minimal samples.
///
/// Each sample is produced by rejection: the whole index vector is redrawn
/// from a uniform distribution until all entries are distinct. The retry is
/// unbounded, which is a documented liveness risk when the point count is
/// close to the sample size.
pub struct UniformSampler {
    n_samples: usize,
    rng: UniformRandomGenerator,
}

impl UniformSampler {
    /// Construct a sampler producing `n_samples` samples per generate run.
    pub fn new(n_samples: usize) -> Self {
        Self {
            n_samples,
            rng: UniformRandomGenerator::new(),
        }
    }

    /// Construct a sampler from a fixed seed (primarily for tests).
    pub fn from_seed(n_samples: usize, seed: u64) -> Self {
        Self {
            n_samples,
            rng: UniformRandomGenerator::from_seed(seed),
        }
    }
}

impl Sampler for UniformSampler {
    fn generate<'a>(
        &'a mut self,
        data: &'a DataMatrix,
        sample_size: usize,
    ) -> Box<dyn Iterator<Item = Sample> + 'a> {
        let n = data.nrows();
        if sample_size == 0 || n < sample_size {
            return Box::new(std::iter::empty());
        }

        self.rng.reset(0, n - 1);
        let total = self.n_samples;
        let mut produced = 0usize;

        Box::new(std::iter::from_fn(move || {
            if produced == total {
                return None;
            }
            produced += 1;
            let mut sample = vec![0usize; sample_size];
            self.rng.draw_distinct(&mut sample);
            Some(sample)
        }))
    }
}
