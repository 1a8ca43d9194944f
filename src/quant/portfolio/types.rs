//! # Portfolio Types
//!
//! $$
//! \sigma_p = \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}},\qquad \mu_p = \mathbf{w}^\top \mu
//! $$
//!
//! Shared enums and result containers for frontier construction.

use clap::ValueEnum;
use serde::Serialize;

/// Factorization used to solve the KKT system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SolverMethod {
  /// Column-pivoted Householder QR.
  #[default]
  #[value(name = "qr", alias = "col-piv-qr")]
  ColPivQr,
  /// LU with partial pivoting.
  #[value(name = "lu", alias = "partial-lu")]
  Lu,
}

/// One point on the efficient frontier.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrontierPoint {
  /// Portfolio standard deviation.
  pub risk: f64,
  /// Target expected return the point was solved for.
  #[serde(rename = "return")]
  pub expected_return: f64,
  /// Minimum-variance weights for the target (may be negative).
  #[serde(skip_serializing)]
  pub weights: Vec<f64>,
}

/// A randomly drawn long-only portfolio.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SampledPortfolio {
  pub risk: f64,
  #[serde(rename = "return")]
  pub expected_return: f64,
  #[serde(skip_serializing)]
  pub weights: Vec<f64>,
}

/// Risk and return of holding a single asset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetPoint {
  /// Ticker or positional label.
  pub ticker: String,
  pub risk: f64,
  #[serde(rename = "return")]
  pub expected_return: f64,
}
