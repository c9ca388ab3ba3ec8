use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, KMeansError>;

/// Errors returned while constructing or running a k-means calculation.
///
/// Configuration and input errors are raised before any iteration runs. There is no
/// partial result on failure: fix the configuration / input and run again.
#[derive(Debug, Error)]
pub enum KMeansError {
    /// Invalid run configuration (e.g. cluster count and label count differ).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The point table is missing, unreadable, empty or not rectangular.
    #[error("input error: {0}")]
    Input(String),
    /// A cluster lost all of its points and [`crate::EmptyClusterPolicy::Fail`] was requested.
    #[error("cluster {cluster} has no assigned points after iteration {iteration}")]
    DegenerateCluster { cluster: usize, iteration: usize },
    /// The abort strategy did not report convergence within the iteration limit.
    #[error("no convergence after {iterations} iterations (last error: {distsum:.3})")]
    ConvergenceTimeout { iterations: usize, distsum: f64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
