//! # Portfolio Errors
//!
//! Error taxonomy for frontier construction. [`FrontierError::SingularSystem`]
//! is raised once when the KKT system is factorized. [`FrontierError::IllConditioned`]
//! and [`FrontierError::InvalidCovariance`] belong to a single grid point, and
//! the driver aborts the whole frontier on the first one. The remaining
//! variants come from loading, sampling and reporting around the solve.

use thiserror::Error;

/// Error type for frontier loading and solving.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrontierError {
  /// Input shapes or values do not describe a problem.
  #[error("Malformed input: {0}")]
  MalformedInput(String),

  /// The target-return grid cannot be built.
  #[error("Degenerate grid: {0}")]
  DegenerateGrid(String),

  /// The KKT matrix lost rank during factorization.
  #[error("Singular KKT system: numerical rank {rank} of {dim}")]
  SingularSystem { rank: usize, dim: usize },

  /// The solve for one target left a residual above tolerance.
  #[error("Ill-conditioned KKT system at target {target}: relative residual {residual:e}")]
  IllConditioned { target: f64, residual: f64 },

  /// `w' cov w` came out negative beyond floating-point noise.
  #[error("Invalid covariance: portfolio variance {variance:e} is negative")]
  InvalidCovariance { variance: f64 },

  /// The random-portfolio distribution could not be built.
  #[error("Sampling failed: {0}")]
  Sampling(String),

  /// The report could not be rendered.
  #[error("Serialization failed: {0}")]
  Serialization(String),
}

/// Result type for frontier operations.
pub type Result<T> = std::result::Result<T, FrontierError>;
