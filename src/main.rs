use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use markowitz_frontier::quant::portfolio::parse_price_table;
use markowitz_frontier::quant::portfolio::parse_problem;
use markowitz_frontier::quant::portfolio::single_asset_points;
use markowitz_frontier::quant::portfolio::FrontierConfig;
use markowitz_frontier::quant::portfolio::FrontierReport;
use markowitz_frontier::quant::portfolio::FrontierSolver;
use markowitz_frontier::quant::portfolio::PortfolioCloud;
use markowitz_frontier::quant::portfolio::SolverMethod;
use markowitz_frontier::quant::portfolio::TRADING_DAYS;
use tracing_subscriber::EnvFilter;

/// Sample the mean-variance efficient frontier.
///
/// Reads `n`, `mu`, row-major `cov` and `n_points` from stdin (or `--input`)
/// and writes `{"frontier": [{"risk":..,"return":..}, ..]}` to stdout.
#[derive(Parser, Debug)]
#[command(name = "markowitz-frontier", version)]
struct Cli {
  /// Numeric problem stream; stdin when omitted.
  #[arg(long, conflicts_with = "prices")]
  input: Option<PathBuf>,

  /// Close-price CSV (ticker header) to estimate annualized moments from.
  #[arg(long, requires = "points")]
  prices: Option<PathBuf>,

  /// Number of frontier points; overrides the value in the input stream.
  #[arg(long)]
  points: Option<usize>,

  /// KKT factorization.
  #[arg(long, value_enum, default_value_t = SolverMethod::ColPivQr)]
  solver: SolverMethod,

  /// Solve grid points in parallel.
  #[arg(long)]
  parallel: bool,

  /// Also emit this many random long-only portfolios and the single assets.
  #[arg(long)]
  monte_carlo: Option<usize>,

  /// Seed for the random portfolios.
  #[arg(long)]
  seed: Option<u64>,

  #[arg(long, default_value_t = FrontierConfig::default().rank_tol)]
  rank_tol: f64,

  #[arg(long, default_value_t = FrontierConfig::default().residual_tol)]
  residual_tol: f64,

  #[arg(long, default_value_t = FrontierConfig::default().psd_tol)]
  psd_tol: f64,
}

fn read_source(path: Option<&PathBuf>) -> Result<String> {
  match path {
    Some(path) => {
      fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
    None => {
      let mut text = String::new();
      std::io::stdin()
        .read_to_string(&mut text)
        .context("reading stdin")?;
      Ok(text)
    }
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let problem = match &cli.prices {
    Some(path) => {
      let table = parse_price_table(&read_source(Some(path))?)
        .with_context(|| format!("parsing price table {}", path.display()))?;
      let points = cli.points.context("--prices needs --points")?;
      table.to_problem(points, TRADING_DAYS)?
    }
    None => {
      let problem = parse_problem(&read_source(cli.input.as_ref())?).context("parsing problem")?;
      match cli.points {
        Some(points) => problem.with_points(points),
        None => problem,
      }
    }
  };

  let config = FrontierConfig {
    method: cli.solver,
    parallel: cli.parallel,
    rank_tol: cli.rank_tol,
    residual_tol: cli.residual_tol,
    psd_tol: cli.psd_tol,
  };
  let psd_tol = config.psd_tol;

  let solver = FrontierSolver::new(problem, config).context("building KKT system")?;
  let frontier = solver.solve().context("solving efficient frontier")?;

  let cloud = match cli.monte_carlo {
    Some(n_portfolios) => Some((
      PortfolioCloud::new(n_portfolios, cli.seed).sample(solver.problem(), psd_tol)?,
      single_asset_points(solver.problem()),
    )),
    None => None,
  };

  let report = match &cloud {
    Some((portfolios, assets)) => FrontierReport::new(&frontier).with_cloud(portfolios, assets),
    None => FrontierReport::new(&frontier),
  };

  let mut stdout = std::io::stdout().lock();
  writeln!(stdout, "{}", report.to_json()?).context("writing report")?;

  Ok(())
}
