//! Sampling strategies producing minimal samples from a point set.
//!
//! All samplers expose the same lazy, pull-based [`Sampler::generate`]
//! surface: each sample is drawn only when the consumer requests it, samples
//! are produced exactly once, and dropping the iterator cancels any remaining
//! work without further signaling.

pub mod local;
pub mod uniform;

pub use local::AdaptiveLocalSampler;
pub use uniform::UniformSampler;

use crate::types::{DataMatrix, Sample};

/// Sampler responsible for drawing minimal samples from the data.
pub trait Sampler {
    /// Lazily draw samples of `sample_size` distinct row indices of `data`.
    ///
    /// The returned sequence is single-pass and non-restartable; samplers may
    /// yield fewer samples than configured when their retry budget runs out.
    fn generate<'a>(
        &'a mut self,
        data: &'a DataMatrix,
        sample_size: usize,
    ) -> Box<dyn Iterator<Item = Sample> + 'a>;
}
