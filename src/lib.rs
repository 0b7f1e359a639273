//! # hypofit: robust model fitting with incremental low-rank maintenance
//!
//! `hypofit` supports robust fitting of parametric geometric models to noisy
//! point data. It combines two pieces:
//!
//! - a **hypothesis pipeline** that draws randomized minimal samples from a
//!   point set, fits a model per sample, and scores inliers, exposed as lazy,
//!   pull-based sequences that a consumer can abandon at any point; and
//! - an **incrementally maintained SVD** ([`IncrementalSvd`]) that tracks the
//!   rank-truncated factorization of a matrix as rank-one contributions are
//!   added or cancelled, without recomputing the full decomposition on every
//!   change.
//!
//! ## Quick start
//!
//! ```rust
//! use hypofit::{ransac_generator, Circle, DataMatrix, UniformSampler};
//!
//! // Five points on the unit circle.
//! let coords = [
//!     (1.0, 0.0),
//!     (0.0, 1.0),
//!     (-1.0, 0.0),
//!     (0.0, -1.0),
//!     (0.7071067811865476, 0.7071067811865476),
//! ];
//! let mut points = DataMatrix::zeros(5, 2);
//! for (i, &(x, y)) in coords.iter().enumerate() {
//!     points[(i, 0)] = x;
//!     points[(i, 1)] = y;
//! }
//!
//! let mut sampler = UniformSampler::from_seed(10, 7);
//! for hypothesis in ransac_generator::<Circle, _>(&points, &mut sampler, 1e-6) {
//!     let (model, mask) = hypothesis.unwrap();
//!     assert!((model.radius - 1.0).abs() < 1e-6);
//!     assert!(mask.iter().all(|&m| m));
//! }
//! ```
//!
//! ## Extending the library
//!
//! New geometric models implement the [`Model`] capability
//! (`MIN_SAMPLE_SIZE` / `fit` / `distances`); new sampling strategies
//! implement [`Sampler`] and plug into the same pipeline.
//!
//! ## Modules
//!
//! - **[`samplers`]**: minimal-sample strategies (uniform, adaptive local)
//! - **[`models`]**: the model capability and built-in variants
//! - **[`ransac`]**: the lazy hypothesis-generation pipeline
//! - **[`svd`]**: the incremental factorization maintainer
//! - **[`numeric`]**: norms, error metrics, and decomposition wrappers
//!
//! Everything is single-threaded and synchronous; laziness, not concurrency,
//! is the suspension mechanism throughout.

pub mod errors;
pub mod models;
pub mod numeric;
pub mod ransac;
pub mod samplers;
pub mod svd;
pub mod types;
pub mod utils;

// Re-export the core surface for convenience.
pub use errors::{ConvergenceError, FittingError};
pub use models::{Circle, Model};
pub use ransac::{inliers, model_generator, ransac_generator};
pub use samplers::{AdaptiveLocalSampler, Sampler, UniformSampler};
pub use svd::{Factors, IncrementalSvd};
pub use types::{DataMatrix, InlierMask, Sample};
