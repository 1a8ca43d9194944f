//! # KKT System
//!
//! $$
//! \begin{bmatrix} 2\Sigma & \mu & \mathbf{1} \\ \mu^\top & 0 & 0 \\ \mathbf{1}^\top & 0 & 0 \end{bmatrix}
//! \begin{bmatrix} \mathbf{w} \\ \lambda_1 \\ \lambda_2 \end{bmatrix}
//! =
//! \begin{bmatrix} \mathbf{0} \\ R \\ 1 \end{bmatrix}
//! $$
//!
//! Stationarity conditions of the fully invested minimum-variance problem
//! with a target return. The matrix depends only on `mu` and `cov`, so it is
//! assembled and factorized once and every target reuses the factorization.

use approx::relative_eq;
use nalgebra::linalg::ColPivQR;
use nalgebra::linalg::LU;
use nalgebra::DMatrix;
use nalgebra::DVector;
use nalgebra::Dyn;
use nalgebra::SVD;
use tracing::debug;
use tracing::warn;

use super::error::FrontierError;
use super::error::Result;
use super::types::SolverMethod;

/// Which constraints the assembled system carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KktForm {
  /// Return and budget constraints, `(n+2)x(n+2)`.
  Full,
  /// Budget constraint only, `(n+1)x(n+1)`. Used when every asset has the
  /// same expected return, where the return row duplicates the budget row.
  BudgetOnly,
}

/// Weights and multipliers for one target.
#[derive(Clone, Debug, PartialEq)]
pub struct KktSolution {
  pub weights: Vec<f64>,
  /// Multiplier of `w' mu = R`; `None` for [`KktForm::BudgetOnly`].
  pub return_multiplier: Option<f64>,
  /// Multiplier of `w' 1 = 1`.
  pub budget_multiplier: f64,
}

enum Factorization {
  Qr(ColPivQR<f64, Dyn, Dyn>),
  Lu(LU<f64, Dyn, Dyn>),
}

/// Assemble the `(n+2)x(n+2)` KKT matrix for `mu` and `cov`.
pub fn assemble_kkt_matrix(mu: &DVector<f64>, cov: &DMatrix<f64>) -> DMatrix<f64> {
  let n = mu.len();
  let mut a = DMatrix::zeros(n + 2, n + 2);
  a.view_mut((0, 0), (n, n)).copy_from(&(cov * 2.0));

  for i in 0..n {
    a[(i, n)] = mu[i];
    a[(i, n + 1)] = 1.0;
    a[(n, i)] = mu[i];
    a[(n + 1, i)] = 1.0;
  }

  a
}

/// Assemble the `(n+1)x(n+1)` budget-only system for `cov`.
pub fn assemble_budget_matrix(cov: &DMatrix<f64>) -> DMatrix<f64> {
  let n = cov.nrows();
  let mut a = DMatrix::zeros(n + 1, n + 1);
  a.view_mut((0, 0), (n, n)).copy_from(&(cov * 2.0));

  for i in 0..n {
    a[(i, n)] = 1.0;
    a[(n, i)] = 1.0;
  }

  a
}

fn numerical_rank(matrix: &DMatrix<f64>, rank_tol: f64) -> usize {
  let singular_values = SVD::new(matrix.clone(), false, false).singular_values;
  let max_sv = singular_values.max();
  if !max_sv.is_finite() || max_sv <= 0.0 {
    return 0;
  }
  singular_values
    .iter()
    .filter(|&&sv| sv > rank_tol * max_sv)
    .count()
}

/// Factorized KKT system shared read-only by every frontier point.
///
/// The system is equilibrated before factorization: `cov` is divided by its
/// largest absolute entry and the return row is replaced by
/// `(mu - min(mu)) / (max(mu) - min(mu))`. Both are row/column operations
/// that leave the weights unchanged; multipliers are mapped back in
/// [`KktSystem::solve`].
pub struct KktSystem {
  matrix: DMatrix<f64>,
  matrix_norm: f64,
  factorization: Factorization,
  form: KktForm,
  n_assets: usize,
  rank: usize,
  residual_tol: f64,
  cov_scale: f64,
  return_offset: f64,
  return_spread: f64,
}

impl KktSystem {
  /// Assemble, equilibrate and factorize the system.
  ///
  /// Fails with [`FrontierError::SingularSystem`] when a singular value of
  /// the equilibrated matrix falls below `rank_tol` relative to the largest.
  pub fn new(
    mu: &DVector<f64>,
    cov: &DMatrix<f64>,
    method: SolverMethod,
    rank_tol: f64,
    residual_tol: f64,
  ) -> Result<Self> {
    let n_assets = mu.len();
    let (min_mu, max_mu) = (mu.min(), mu.max());
    let form = if relative_eq!(min_mu, max_mu) {
      KktForm::BudgetOnly
    } else {
      KktForm::Full
    };

    let cov_scale = match cov.amax() {
      s if s > 0.0 && s.is_finite() => s,
      _ => 1.0,
    };
    let scaled_cov = cov / cov_scale;
    let return_spread = max_mu - min_mu;

    let matrix = match form {
      KktForm::Full => {
        let scaled_mu = mu.map(|m| (m - min_mu) / return_spread);
        assemble_kkt_matrix(&scaled_mu, &scaled_cov)
      }
      KktForm::BudgetOnly => assemble_budget_matrix(&scaled_cov),
    };
    let dim = matrix.nrows();
    let rank = numerical_rank(&matrix, rank_tol);

    debug!(dim, rank, cov_scale, return_spread, ?form, ?method, "equilibrated KKT system");

    if rank < dim {
      warn!(dim, rank, "KKT system is rank deficient");
      return Err(FrontierError::SingularSystem { rank, dim });
    }

    let factorization = match method {
      SolverMethod::ColPivQr => Factorization::Qr(matrix.clone().col_piv_qr()),
      SolverMethod::Lu => Factorization::Lu(matrix.clone().lu()),
    };

    Ok(Self {
      matrix_norm: matrix.norm(),
      matrix,
      factorization,
      form,
      n_assets,
      rank,
      residual_tol,
      cov_scale,
      return_offset: min_mu,
      return_spread,
    })
  }

  pub fn form(&self) -> KktForm {
    self.form
  }

  pub fn dim(&self) -> usize {
    self.matrix.nrows()
  }

  /// Equilibrated matrix that was factorized.
  pub fn matrix(&self) -> &DMatrix<f64> {
    &self.matrix
  }

  /// Equilibrated right-hand side for `target`; only the return entry varies.
  pub fn rhs(&self, target: f64) -> DVector<f64> {
    let n = self.n_assets;
    let mut b = DVector::zeros(self.dim());
    match self.form {
      KktForm::Full => {
        b[n] = (target - self.return_offset) / self.return_spread;
        b[n + 1] = 1.0;
      }
      KktForm::BudgetOnly => b[n] = 1.0,
    }
    b
  }

  /// Solve for the minimum-variance portfolio with expected return `target`.
  pub fn solve(&self, target: f64) -> Result<KktSolution> {
    let b = self.rhs(target);
    let x = match &self.factorization {
      Factorization::Qr(qr) => qr.solve(&b),
      Factorization::Lu(lu) => lu.solve(&b),
    }
    .ok_or(FrontierError::SingularSystem {
      rank: self.rank,
      dim: self.dim(),
    })?;

    let residual = (&self.matrix * &x - &b).norm();
    let scale = self.matrix_norm * x.norm() + b.norm();
    let relative = if scale > 0.0 { residual / scale } else { residual };
    if !relative.is_finite() || relative > self.residual_tol {
      return Err(FrontierError::IllConditioned {
        target,
        residual: relative,
      });
    }

    let n = self.n_assets;
    let weights = x.rows(0, n).iter().copied().collect();
    let c = self.cov_scale;
    let (return_multiplier, budget_multiplier) = match self.form {
      KktForm::Full => {
        let lambda_r = x[n] / self.return_spread;
        (
          Some(c * lambda_r),
          c * (x[n + 1] - lambda_r * self.return_offset),
        )
      }
      KktForm::BudgetOnly => (None, c * x[n]),
    };

    Ok(KktSolution {
      weights,
      return_multiplier,
      budget_multiplier,
    })
  }
}
