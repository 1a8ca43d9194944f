//! # Portfolio Cloud
//!
//! $$
//! \mathbf{w} \sim \operatorname{Dir}(1,\dots,1)
//! $$
//!
//! Random long-only portfolios and single-asset points plotted around the
//! frontier for reference.

use impl_new_derive::ImplNew;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Dirichlet;
use rand_distr::Distribution;
use tracing::debug;

use super::error::FrontierError;
use super::error::Result;
use super::problem::FrontierProblem;
use super::risk::portfolio_return;
use super::risk::portfolio_risk;
use super::types::AssetPoint;
use super::types::SampledPortfolio;

/// Monte Carlo sampler of fully invested long-only portfolios.
#[derive(ImplNew, Clone, Debug)]
pub struct PortfolioCloud {
  /// Number of portfolios to draw.
  pub n_portfolios: usize,
  /// Seed for reproducible draws; entropy-seeded when `None`.
  pub seed: Option<u64>,
}

impl Default for PortfolioCloud {
  fn default() -> Self {
    Self {
      n_portfolios: 100,
      seed: None,
    }
  }
}

impl PortfolioCloud {
  /// Draw portfolios from a flat Dirichlet and evaluate them on `problem`.
  pub fn sample(&self, problem: &FrontierProblem, psd_tol: f64) -> Result<Vec<SampledPortfolio>> {
    let n = problem.n_assets();
    let mut rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    let dirichlet = if n > 1 { Some(flat_dirichlet(n)?) } else { None };

    let portfolios = (0..self.n_portfolios)
      .map(|_| -> Result<SampledPortfolio> {
        let weights = match &dirichlet {
          Some(d) => d.sample(&mut rng),
          None => vec![1.0],
        };
        Ok(SampledPortfolio {
          risk: portfolio_risk(&weights, problem.cov(), psd_tol)?,
          expected_return: portfolio_return(&weights, problem.mu()),
          weights,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    debug!(n_portfolios = portfolios.len(), "sampled portfolio cloud");
    Ok(portfolios)
  }
}

fn flat_dirichlet(n: usize) -> Result<Dirichlet<f64>> {
  Dirichlet::new(&vec![1.0_f64; n]).map_err(|err| FrontierError::Sampling(err.to_string()))
}

/// Risk and return of each asset held alone.
pub fn single_asset_points(problem: &FrontierProblem) -> Vec<AssetPoint> {
  problem
    .labels()
    .iter()
    .enumerate()
    .map(|(i, ticker)| AssetPoint {
      ticker: ticker.clone(),
      risk: problem.cov()[(i, i)].max(0.0).sqrt(),
      expected_return: problem.mu()[i],
    })
    .collect()
}
