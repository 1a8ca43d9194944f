//! # Portfolio Data Utilities
//!
//! $$
//! \hat\mu_i = P\,\bar r_i,\qquad \hat\Sigma_{ij} = \frac{P}{T-1}\sum_t (r_{it}-\bar r_i)(r_{jt}-\bar r_j)
//! $$
//!
//! Helpers turning close-price columns into annualized frontier inputs.

use nalgebra::DMatrix;
use nalgebra::DVector;

use super::error::FrontierError;
use super::error::Result;

/// Trading days used to annualize daily moments.
pub const TRADING_DAYS: f64 = 252.0;

fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

/// Convert close prices to simple (percentage-change) returns.
pub fn simple_returns_series(closes: &[f64]) -> Vec<f64> {
  closes
    .windows(2)
    .map(|pair| pair[1] / pair[0] - 1.0)
    .collect()
}

/// Sample covariance matrix (`T - 1` denominator) of aligned return series.
pub fn sample_covariance(returns: &[Vec<f64>]) -> DMatrix<f64> {
  let n = returns.len();
  let t = returns.first().map(|r| r.len()).unwrap_or(0);
  if t < 2 {
    return DMatrix::zeros(n, n);
  }

  let means: Vec<f64> = returns.iter().map(|r| sample_mean(r)).collect();
  let mut cov = DMatrix::zeros(n, n);

  for i in 0..n {
    for j in i..n {
      let acc: f64 = (0..t)
        .map(|k| (returns[i][k] - means[i]) * (returns[j][k] - means[j]))
        .sum();
      let c = acc / (t - 1) as f64;
      cov[(i, j)] = c;
      cov[(j, i)] = c;
    }
  }

  cov
}

/// Annualized mean returns and covariance from aligned close-price columns.
pub fn annualized_moments(
  price_columns: &[Vec<f64>],
  periods_per_year: f64,
) -> Result<(DVector<f64>, DMatrix<f64>)> {
  let rows = price_columns.first().map(|c| c.len()).unwrap_or(0);
  if price_columns.is_empty() {
    return Err(FrontierError::MalformedInput(
      "no price columns supplied".to_string(),
    ));
  }
  if let Some(i) = price_columns.iter().position(|c| c.len() != rows) {
    return Err(FrontierError::MalformedInput(format!(
      "price column {i} has {} rows, expected {rows}",
      price_columns[i].len()
    )));
  }
  if rows < 3 {
    return Err(FrontierError::MalformedInput(format!(
      "{rows} price rows give fewer than two returns"
    )));
  }
  if price_columns.iter().flatten().any(|&p| !(p > 0.0) || !p.is_finite()) {
    return Err(FrontierError::MalformedInput(
      "prices must be positive and finite".to_string(),
    ));
  }

  let returns: Vec<Vec<f64>> = price_columns
    .iter()
    .map(|c| simple_returns_series(c))
    .collect();

  let mu = DVector::from_iterator(
    returns.len(),
    returns.iter().map(|r| sample_mean(r) * periods_per_year),
  );
  let cov = sample_covariance(&returns) * periods_per_year;

  Ok((mu, cov))
}
