//! # kmeans-em - API documentation
//!
//! kmeans-em is a small rust library for k-means clustering with the classic Expectation-Maximization
//! iteration: every sample is assigned to its nearest centroid (expectation), then every centroid is
//! moved to the mean of its samples (maximization), until the partition stops changing.
//!
//! ## Design target
//! The whole point table lives in memory and the calculation is single-threaded and deterministic for a
//! seeded random number generator. Samples are given as a raw row-major vector, no matrix crate involved.
//!
//! The error metric reported for a result is the sum of the (non-squared) euclidean distances
//! of all samples to their assigned centroid.
//!
//! ## Supported centroid initializations
//! The outcome of each K-Means run depends on the initialization of its clusters. For a list of implemented
//! initialization methods, see [`KMeans`]. The default seeding draws every coordinate from a fixed range
//! (`[-10, 10)`), see [`KMeansConfigBuilder::init_range`].
//!
//! ## Convergence
//! When a calculation counts as converged is decided by an [`AbortStrategy`]. Independent of the strategy,
//! `max_iter` bounds the amount of iterations, a calculation exceeding it fails with
//! [`KMeansError::ConvergenceTimeout`]. Clusters that run empty are handled as configured by
//! [`EmptyClusterPolicy`].
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_em::*;
//! use rand::prelude::*;
//!
//! fn main() {
//!     let (sample_cnt, sample_dims, k, max_iter) = (2000, 3, 4, 1000);
//!
//!     // Generate some random data
//!     let mut rnd = StdRng::seed_from_u64(42);
//!     let samples = generate_samples(sample_cnt, sample_dims, -10.0f64, 10.0, &mut rnd).unwrap();
//!
//!     // Calculate kmeans, seeding the centroids within [-10, 10)
//!     let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
//!     let conf = KMeansConfig::build().random_generator(rnd).build();
//!     let result = kmean.kmeans_em(k, max_iter, KMeans::init_random_range, &conf).unwrap();
//!
//!     println!("Centroids: {:?}", result.centroids);
//!     println!("Cluster-Assignments: {:?}", result.assignments);
//!     println!("Error: {}", result.distsum);
//! }
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kmeans_em::*;
//!
//! fn main() {
//!     let (sample_cnt, sample_dims, k, max_iter) = (2000, 5, 4, 1000);
//!
//!     // Generate some random data
//!     let samples = generate_samples(sample_cnt, sample_dims, 0.0f64, 1.0, &mut rand::thread_rng()).unwrap();
//!
//!     let conf = KMeansConfig::build()
//!         .init_done(&|_| println!("Initialization completed."))
//!         .iteration_done(&|s, nr, prev_distsum|
//!             println!("Iteration {} - Error: {:.2} -> {:.2}", nr, prev_distsum, s.distsum))
//!         .init_range(0.0, 1.0)
//!         .build();
//!
//!     let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
//!     let result = kmean.kmeans_em(k, max_iter, KMeans::init_random_sample, &conf).unwrap();
//!
//!     println!("Error: {}", result.distsum);
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct, holding the point table. It is generic over the
//! underlying primitive type used for the calculations.
//!
//! [`KMeans::kmeans_em`] runs a calculation without mutating the [`KMeans`] instance. Internally, a new
//! instance of [`KMeansState`] is used to store the state (and finally the result) of the calculation.
//!
//! Around the engine, [`table`] reads point tables from and writes results to delimited text files,
//! [`NameMap`] translates cluster indices into display names and [`datagen`] produces synthetic inputs.

#[macro_use] mod helpers;
mod memory;
mod error;
mod api;
mod variants;
mod inits;
mod abort_strategy;
mod labels;
pub mod table;
pub mod datagen;

pub use abort_strategy::AbortStrategy;
pub(crate) use api::CentroidUpdate;
pub use api::{EmptyClusterPolicy, KMeansState, KMeansConfig, KMeansConfigBuilder, KMeans};
pub use datagen::generate_samples;
pub use error::{KMeansError, Result};
pub use labels::NameMap;
pub use memory::Primitive;
