//! # Efficient Frontier
//!
//! $$
//! \sigma^\*(R) = \min_{\mathbf{w}} \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}
//! \quad \text{s.t.}\quad \mathbf{w}^\top\mu = R,\ \mathbf{w}^\top\mathbf{1} = 1
//! $$
//!
//! Driver that factorizes the KKT system once and walks the target grid.

use rayon::prelude::*;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::error::Result;
use super::grid::target_grid;
use super::kkt::KktSystem;
use super::problem::FrontierProblem;
use super::risk::portfolio_risk;
use super::types::FrontierPoint;
use super::types::SolverMethod;

/// Runtime configuration for [`FrontierSolver`].
#[derive(Clone, Debug)]
pub struct FrontierConfig {
  /// Factorization of the KKT matrix.
  pub method: SolverMethod,
  /// Solve grid points on the rayon pool.
  pub parallel: bool,
  /// Relative threshold on triangular-factor pivots for numerical rank.
  pub rank_tol: f64,
  /// Maximum relative residual `|Ax - b| / (|A||x| + |b|)` per point.
  pub residual_tol: f64,
  /// Relative tolerance for clamping negative variance to zero.
  pub psd_tol: f64,
}

impl Default for FrontierConfig {
  fn default() -> Self {
    Self {
      method: SolverMethod::ColPivQr,
      parallel: false,
      rank_tol: 1e-12,
      residual_tol: 1e-8,
      psd_tol: 1e-10,
    }
  }
}

/// Minimum-variance frontier over a sampled grid of target returns.
pub struct FrontierSolver {
  problem: FrontierProblem,
  config: FrontierConfig,
  system: KktSystem,
}

impl FrontierSolver {
  /// Factorize the KKT system for `problem`.
  pub fn new(problem: FrontierProblem, config: FrontierConfig) -> Result<Self> {
    let system = KktSystem::new(
      problem.mu(),
      problem.cov(),
      config.method,
      config.rank_tol,
      config.residual_tol,
    )?;

    Ok(Self {
      problem,
      config,
      system,
    })
  }

  pub fn problem(&self) -> &FrontierProblem {
    &self.problem
  }

  pub fn config(&self) -> &FrontierConfig {
    &self.config
  }

  pub fn system(&self) -> &KktSystem {
    &self.system
  }

  /// Target returns the frontier is sampled at.
  pub fn targets(&self) -> Result<Vec<f64>> {
    let (min_mu, max_mu) = self.problem.return_range();
    target_grid(min_mu, max_mu, self.problem.n_points())
  }

  /// Minimum-variance portfolio for a single target return.
  pub fn solve_point(&self, target: f64) -> Result<FrontierPoint> {
    let solution = self.system.solve(target)?;
    let risk = portfolio_risk(&solution.weights, self.problem.cov(), self.config.psd_tol)
      .inspect_err(|err| warn!(target_return = target, %err, "rejecting frontier point"))?;

    Ok(FrontierPoint {
      risk,
      expected_return: target,
      weights: solution.weights,
    })
  }

  /// Solve every grid point in ascending target order.
  ///
  /// Aborts on the first point that fails; no partial frontier is returned.
  pub fn solve(&self) -> Result<Vec<FrontierPoint>> {
    let targets = self.targets()?;
    info!(
      n_assets = self.problem.n_assets(),
      n_points = targets.len(),
      parallel = self.config.parallel,
      "solving efficient frontier"
    );

    let points = if self.config.parallel {
      targets
        .into_par_iter()
        .map(|target| self.solve_point(target))
        .collect::<Result<Vec<_>>>()?
    } else {
      targets
        .into_iter()
        .map(|target| self.solve_point(target))
        .collect::<Result<Vec<_>>>()?
    };

    debug!(n_points = points.len(), "frontier solved");
    Ok(points)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use tracing_test::traced_test;

  use super::*;
  use crate::quant::portfolio::error::FrontierError;
  use crate::quant::portfolio::risk::portfolio_return;

  fn three_assets(n_points: usize) -> FrontierProblem {
    FrontierProblem::new(
      vec![0.08, 0.1, 0.12],
      vec![
        vec![0.04, 0.01, 0.0],
        vec![0.01, 0.09, 0.02],
        vec![0.0, 0.02, 0.16],
      ],
      n_points,
    )
    .unwrap()
  }

  #[test]
  fn two_asset_scenario() {
    let problem =
      FrontierProblem::new(vec![0.1, 0.2], vec![vec![0.04, 0.0], vec![0.0, 0.09]], 3).unwrap();
    let points = FrontierSolver::new(problem, FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();

    let returns: Vec<f64> = points.iter().map(|p| p.expected_return).collect();
    assert_abs_diff_eq!(returns[0], 0.1, epsilon = 1e-15);
    assert_abs_diff_eq!(returns[1], 0.15, epsilon = 1e-15);
    assert_abs_diff_eq!(returns[2], 0.2, epsilon = 1e-15);

    assert_abs_diff_eq!(points[0].weights[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(points[0].weights[1], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(points[0].risk, 0.2, epsilon = 1e-12);
    assert_abs_diff_eq!(points[2].weights[0], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(points[2].weights[1], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(points[2].risk, 0.3, epsilon = 1e-12);
  }

  #[test]
  fn weights_satisfy_both_constraints() {
    let problem = three_assets(25);
    let mu = problem.mu().clone();
    let solver = FrontierSolver::new(problem, FrontierConfig::default()).unwrap();

    for point in solver.solve().unwrap() {
      let sum_w: f64 = point.weights.iter().sum();
      assert!((sum_w - 1.0).abs() < 1e-9);
      assert!((portfolio_return(&point.weights, &mu) - point.expected_return).abs() < 1e-9);
      assert!(point.risk >= 0.0);
    }
  }

  #[test]
  fn lu_matches_qr() {
    let qr = FrontierSolver::new(three_assets(10), FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();
    let lu = FrontierSolver::new(
      three_assets(10),
      FrontierConfig {
        method: SolverMethod::Lu,
        ..FrontierConfig::default()
      },
    )
    .unwrap()
    .solve()
    .unwrap();

    for (a, b) in qr.iter().zip(lu.iter()) {
      assert_abs_diff_eq!(a.risk, b.risk, epsilon = 1e-10);
    }
  }

  #[test]
  fn parallel_output_matches_serial() {
    let serial = FrontierSolver::new(three_assets(64), FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();
    let parallel = FrontierSolver::new(
      three_assets(64),
      FrontierConfig {
        parallel: true,
        ..FrontierConfig::default()
      },
    )
    .unwrap()
    .solve()
    .unwrap();

    assert_eq!(serial, parallel);
  }

  #[test]
  fn single_asset_single_point() {
    let problem = FrontierProblem::new(vec![0.07], vec![vec![0.0625]], 1).unwrap();
    let points = FrontierSolver::new(problem, FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();

    assert_eq!(points.len(), 1);
    assert_abs_diff_eq!(points[0].risk, 0.25, epsilon = 1e-12);
    assert_eq!(points[0].expected_return, 0.07);
    assert_abs_diff_eq!(points[0].weights[0], 1.0, epsilon = 1e-12);
  }

  #[test]
  fn zero_points_yield_empty_frontier() {
    let points = FrontierSolver::new(three_assets(0), FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();
    assert!(points.is_empty());
  }

  #[test]
  fn equal_returns_give_minimum_variance_everywhere() {
    let problem = FrontierProblem::new(
      vec![0.05, 0.05, 0.05],
      vec![
        vec![0.04, 0.0, 0.0],
        vec![0.0, 0.01, 0.0],
        vec![0.0, 0.0, 0.04],
      ],
      4,
    )
    .unwrap();
    let points = FrontierSolver::new(problem, FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();

    assert_eq!(points.len(), 4);
    for point in &points {
      assert_eq!(point.expected_return, 0.05);
      assert_abs_diff_eq!(point.weights[0], 1.0 / 6.0, epsilon = 1e-12);
      assert_abs_diff_eq!(point.weights[1], 4.0 / 6.0, epsilon = 1e-12);
      assert_abs_diff_eq!(point.weights[2], 1.0 / 6.0, epsilon = 1e-12);
    }
  }

  #[test]
  fn risk_is_permutation_invariant() {
    let base = three_assets(7);
    let permuted = FrontierProblem::new(
      vec![0.12, 0.08, 0.1],
      vec![
        vec![0.16, 0.0, 0.02],
        vec![0.0, 0.04, 0.01],
        vec![0.02, 0.01, 0.09],
      ],
      7,
    )
    .unwrap();

    let a = FrontierSolver::new(base, FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();
    let b = FrontierSolver::new(permuted, FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();

    for (pa, pb) in a.iter().zip(b.iter()) {
      assert_abs_diff_eq!(pa.risk, pb.risk, epsilon = 1e-10);
      assert_eq!(pa.expected_return, pb.expected_return);
    }
  }

  // An all-zero covariance is only an error when it makes the KKT matrix
  // singular. With n = 2 the two constraints pin the weights, the matrix is
  // invertible and every point is a valid zero-risk portfolio. From n = 3 on
  // the weights are underdetermined and the system is rejected.
  #[test]
  fn zero_covariance_with_two_assets_is_riskless() {
    let problem = FrontierProblem::new(vec![0.1, 0.2], vec![vec![0.0; 2]; 2], 3).unwrap();
    let points = FrontierSolver::new(problem, FrontierConfig::default())
      .unwrap()
      .solve()
      .unwrap();

    assert_eq!(points.len(), 3);
    for p in &points {
      assert_eq!(p.risk, 0.0);
      assert!(p.weights.iter().all(|w| w.is_finite()));
    }
    assert_abs_diff_eq!(points[1].weights[0], 0.5, epsilon = 1e-12);
  }

  #[test]
  fn singular_covariance_never_emits_nan() {
    let problem = FrontierProblem::new(vec![0.1, 0.2, 0.3], vec![vec![0.0; 3]; 3], 5).unwrap();
    let err = FrontierSolver::new(problem, FrontierConfig::default())
      .err()
      .unwrap();
    assert!(matches!(err, FrontierError::SingularSystem { .. }));
  }

  #[test]
  #[traced_test]
  fn non_psd_covariance_aborts_and_logs() {
    // Invertible KKT system, but the 50/50 mix has negative variance.
    let problem = FrontierProblem::new(
      vec![0.1, 0.2],
      vec![vec![0.01, -0.5], vec![-0.5, 0.01]],
      3,
    )
    .unwrap();
    let solver = FrontierSolver::new(problem, FrontierConfig::default()).unwrap();

    let err = solver.solve().unwrap_err();
    assert!(matches!(err, FrontierError::InvalidCovariance { .. }));
    assert!(logs_contain("rejecting frontier point"));
  }
}
