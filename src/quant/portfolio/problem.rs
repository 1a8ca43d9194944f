//! # Frontier Problem
//!
//! Validated inputs of a frontier run: expected returns, covariance and the
//! number of grid points. Shapes are checked once here so the solver can
//! index freely.

use nalgebra::DMatrix;
use nalgebra::DVector;

use super::error::FrontierError;
use super::error::Result;

/// Immutable asset universe plus the requested frontier resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct FrontierProblem {
  mu: DVector<f64>,
  cov: DMatrix<f64>,
  n_points: usize,
  labels: Vec<String>,
}

impl FrontierProblem {
  /// Build a problem from row-major nested vectors.
  pub fn new(mu: Vec<f64>, cov: Vec<Vec<f64>>, n_points: usize) -> Result<Self> {
    let n = mu.len();
    if cov.len() != n {
      return Err(FrontierError::MalformedInput(format!(
        "covariance has {} rows, expected {n}",
        cov.len()
      )));
    }
    if let Some((i, row)) = cov.iter().enumerate().find(|(_, row)| row.len() != n) {
      return Err(FrontierError::MalformedInput(format!(
        "covariance row {i} has {} columns, expected {n}",
        row.len()
      )));
    }

    let cov = DMatrix::from_fn(n, n, |i, j| cov[i][j]);
    Self::from_nalgebra(DVector::from_vec(mu), cov, n_points)
  }

  /// Build a problem from nalgebra containers.
  pub fn from_nalgebra(mu: DVector<f64>, cov: DMatrix<f64>, n_points: usize) -> Result<Self> {
    let n = mu.len();
    if n == 0 {
      return Err(FrontierError::MalformedInput(
        "at least one asset is required".to_string(),
      ));
    }
    if cov.nrows() != n || cov.ncols() != n {
      return Err(FrontierError::MalformedInput(format!(
        "covariance is {}x{}, expected {n}x{n}",
        cov.nrows(),
        cov.ncols()
      )));
    }
    if let Some(i) = mu.iter().position(|v| !v.is_finite()) {
      return Err(FrontierError::MalformedInput(format!(
        "expected return {i} is not finite"
      )));
    }
    if cov.iter().any(|v| !v.is_finite()) {
      return Err(FrontierError::MalformedInput(
        "covariance contains non-finite entries".to_string(),
      ));
    }

    let labels = (0..n).map(|i| format!("asset_{i}")).collect();

    Ok(Self {
      mu,
      cov,
      n_points,
      labels,
    })
  }

  /// Attach asset labels (tickers).
  pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
    if labels.len() != self.n_assets() {
      return Err(FrontierError::MalformedInput(format!(
        "{} labels for {} assets",
        labels.len(),
        self.n_assets()
      )));
    }
    self.labels = labels;
    Ok(self)
  }

  /// Replace the number of frontier points.
  pub fn with_points(mut self, n_points: usize) -> Self {
    self.n_points = n_points;
    self
  }

  pub fn n_assets(&self) -> usize {
    self.mu.len()
  }

  pub fn n_points(&self) -> usize {
    self.n_points
  }

  pub fn mu(&self) -> &DVector<f64> {
    &self.mu
  }

  pub fn cov(&self) -> &DMatrix<f64> {
    &self.cov
  }

  pub fn labels(&self) -> &[String] {
    &self.labels
  }

  /// Smallest and largest expected return.
  pub fn return_range(&self) -> (f64, f64) {
    (self.mu.min(), self.mu.max())
  }
}
