//! # Portfolio Risk
//!
//! $$
//! \sigma_p = \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! $$

use nalgebra::DMatrix;
use nalgebra::DVector;

use super::error::FrontierError;
use super::error::Result;

/// Quadratic form `w' cov w`.
pub fn portfolio_variance(w: &[f64], cov: &DMatrix<f64>) -> f64 {
  let w = DVector::from_column_slice(w);
  w.dot(&(cov * &w))
}

/// Portfolio standard deviation.
///
/// Negative variance within `psd_tol` of `|w|' |cov| |w|` is rounding noise
/// and is clamped to zero; anything below that means `cov` is not PSD.
pub fn portfolio_risk(w: &[f64], cov: &DMatrix<f64>, psd_tol: f64) -> Result<f64> {
  let variance = portfolio_variance(w, cov);
  if !variance.is_finite() {
    return Err(FrontierError::InvalidCovariance { variance });
  }
  if variance >= 0.0 {
    return Ok(variance.sqrt());
  }

  let abs_w = DVector::from_iterator(w.len(), w.iter().map(|x| x.abs()));
  let magnitude = abs_w.dot(&(cov.abs() * &abs_w));
  if -variance <= psd_tol * magnitude {
    Ok(0.0)
  } else {
    Err(FrontierError::InvalidCovariance { variance })
  }
}

/// Expected portfolio return `w' mu`.
pub fn portfolio_return(w: &[f64], mu: &DVector<f64>) -> f64 {
  w.iter().zip(mu.iter()).map(|(a, b)| a * b).sum()
}
