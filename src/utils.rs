//! Shared randomness utilities.
//!
//! A small wrapper around `rand` providing seedable uniform index draws and
//! the whole-sample rejection scheme used by [`crate::samplers::UniformSampler`].

use rand::distributions::Uniform;
use rand::prelude::*;

/// Returns `true` if any index occurs more than once in `sample`.
pub(crate) fn has_duplicates(sample: &[usize]) -> bool {
    sample
        .iter()
        .enumerate()
        .any(|(i, v)| sample[..i].contains(v))
}

/// Uniform index generator over a configurable inclusive range.
///
/// By default this uses a randomly seeded RNG, but test code can construct
/// it from a fixed seed for reproducible behavior.
pub struct UniformRandomGenerator {
    rng: StdRng,
    dist: Option<Uniform<usize>>,
}

impl Default for UniformRandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandomGenerator {
    /// Construct with a random seed (suitable for production use).
    pub fn new() -> Self {
        let rng = StdRng::from_rng(thread_rng()).expect("failed to seed StdRng");
        Self { rng, dist: None }
    }

    /// Construct with a fixed seed (useful for tests).
    pub fn from_seed(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Self { rng, dist: None }
    }

    /// Reset the distribution to the inclusive range `[min, max]`.
    pub fn reset(&mut self, min: usize, max: usize) {
        self.dist = Some(Uniform::new_inclusive(min, max));
    }

    /// Draw a single index using the current distribution.
    pub fn next(&mut self) -> usize {
        let dist = self
            .dist
            .as_ref()
            .expect("UniformRandomGenerator: distribution not initialized");
        self.rng.sample(dist)
    }

    /// Fill `out` with distinct indices from the current distribution.
    ///
    /// The whole vector is redrawn until all entries are distinct. Retry is
    /// unbounded; this terminates almost surely when the range substantially
    /// exceeds `out.len()`, and is a documented liveness risk when it does not.
    pub fn draw_distinct(&mut self, out: &mut [usize]) {
        loop {
            for v in out.iter_mut() {
                *v = self.next();
            }
            if !has_duplicates(out) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{has_duplicates, UniformRandomGenerator};

    #[test]
    fn distinct_samples_within_bounds() {
        let mut rng = UniformRandomGenerator::from_seed(1234);
        rng.reset(0, 10);
        let mut buf = [0usize; 5];
        rng.draw_distinct(&mut buf);

        assert!(buf.iter().all(|&v| v <= 10));
        assert!(!has_duplicates(&buf));
    }

    #[test]
    fn deterministic_with_same_seed() {
        let mut rng1 = UniformRandomGenerator::from_seed(42);
        let mut rng2 = UniformRandomGenerator::from_seed(42);

        rng1.reset(0, 100);
        rng2.reset(0, 100);

        let a1: Vec<usize> = (0..10).map(|_| rng1.next()).collect();
        let a2: Vec<usize> = (0..10).map(|_| rng2.next()).collect();

        assert_eq!(a1, a2);
    }

    #[test]
    fn duplicate_detection() {
        assert!(!has_duplicates(&[0, 1, 2]));
        assert!(has_duplicates(&[0, 1, 0]));
        assert!(!has_duplicates(&[7]));
        assert!(!has_duplicates(&[]));
    }
}
