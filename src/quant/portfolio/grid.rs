//! # Target-Return Grid
//!
//! $$
//! R_i = \mu_{\min} + \frac{i}{N-1}(\mu_{\max}-\mu_{\min}),\quad i=0,\dots,N-1
//! $$

use super::error::FrontierError;
use super::error::Result;

/// Evenly spaced target returns over `[min_mu, max_mu]`, both ends included.
///
/// `n_points == 1` yields `[min_mu]` and `n_points == 0` yields an empty
/// grid; neither divides by `n_points - 1`.
pub fn target_grid(min_mu: f64, max_mu: f64, n_points: usize) -> Result<Vec<f64>> {
  if !min_mu.is_finite() || !max_mu.is_finite() {
    return Err(FrontierError::DegenerateGrid(format!(
      "return range [{min_mu}, {max_mu}] is not finite"
    )));
  }
  if min_mu > max_mu {
    return Err(FrontierError::DegenerateGrid(format!(
      "return range [{min_mu}, {max_mu}] is inverted"
    )));
  }

  Ok(match n_points {
    0 => Vec::new(),
    1 => vec![min_mu],
    _ => {
      let span = max_mu - min_mu;
      let last = (n_points - 1) as f64;
      let mut grid: Vec<f64> = (0..n_points)
        .map(|i| min_mu + i as f64 / last * span)
        .collect();
      grid[n_points - 1] = max_mu;
      grid
    }
  })
}
