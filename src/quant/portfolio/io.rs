//! # Frontier I/O
//!
//! Loader for the whitespace numeric stream and close-price tables, and the
//! JSON emitter for frontier reports.

use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::data::annualized_moments;
use super::error::FrontierError;
use super::error::Result;
use super::problem::FrontierProblem;
use super::types::AssetPoint;
use super::types::FrontierPoint;
use super::types::SampledPortfolio;

struct Tokens<'a> {
  inner: std::str::SplitWhitespace<'a>,
  consumed: usize,
}

impl<'a> Tokens<'a> {
  fn new(text: &'a str) -> Self {
    Self {
      inner: text.split_whitespace(),
      consumed: 0,
    }
  }

  fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
    let token = self.inner.next().ok_or_else(|| {
      FrontierError::MalformedInput(format!(
        "unexpected end of input reading {what} (after {} values)",
        self.consumed
      ))
    })?;
    self.consumed += 1;
    token.parse().map_err(|_| {
      FrontierError::MalformedInput(format!("cannot parse {what} from '{token}'"))
    })
  }
}

/// Parse `n`, `mu[n]`, row-major `cov[n*n]` and `n_points`.
pub fn parse_problem(text: &str) -> Result<FrontierProblem> {
  let mut tokens = Tokens::new(text);

  let n: usize = tokens.next("asset count")?;
  let mu = (0..n)
    .map(|i| tokens.next::<f64>(&format!("mu[{i}]")))
    .collect::<Result<Vec<_>>>()?;
  let cov = (0..n)
    .map(|i| {
      (0..n)
        .map(|j| tokens.next::<f64>(&format!("cov[{i}][{j}]")))
        .collect::<Result<Vec<_>>>()
    })
    .collect::<Result<Vec<_>>>()?;
  let n_points: usize = tokens.next("point count")?;

  let trailing = tokens.inner.count();
  if trailing > 0 {
    debug!(trailing, "ignoring trailing input tokens");
  }

  FrontierProblem::new(mu, cov, n_points)
}

/// Close prices keyed by ticker, one column per asset.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceTable {
  pub tickers: Vec<String>,
  pub columns: Vec<Vec<f64>>,
}

impl PriceTable {
  /// Annualized frontier problem over `n_points` targets.
  pub fn to_problem(&self, n_points: usize, periods_per_year: f64) -> Result<FrontierProblem> {
    let (mu, cov) = annualized_moments(&self.columns, periods_per_year)?;
    FrontierProblem::from_nalgebra(mu, cov, n_points)?.with_labels(self.tickers.clone())
  }
}

/// Parse a comma-separated close-price table with a ticker header.
///
/// A leading `date` column is skipped. Rows with an empty cell are dropped.
pub fn parse_price_table(text: &str) -> Result<PriceTable> {
  let mut lines = text
    .lines()
    .enumerate()
    .filter(|(_, line)| !line.trim().is_empty());

  let (_, header) = lines
    .next()
    .ok_or_else(|| FrontierError::MalformedInput("price table is empty".to_string()))?;
  let mut tickers: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();
  let skip_date = tickers
    .first()
    .is_some_and(|c| c.eq_ignore_ascii_case("date"));
  if skip_date {
    tickers.remove(0);
  }
  if tickers.is_empty() {
    return Err(FrontierError::MalformedInput(
      "price table has no ticker columns".to_string(),
    ));
  }

  let mut columns = vec![Vec::new(); tickers.len()];
  let mut dropped = 0usize;

  for (line_no, line) in lines {
    let cells: Vec<&str> = line
      .split(',')
      .map(str::trim)
      .skip(usize::from(skip_date))
      .collect();
    if cells.len() != tickers.len() {
      return Err(FrontierError::MalformedInput(format!(
        "line {}: {} cells, expected {}",
        line_no + 1,
        cells.len(),
        tickers.len()
      )));
    }
    if cells.iter().any(|c| c.is_empty()) {
      dropped += 1;
      continue;
    }
    for (column, cell) in columns.iter_mut().zip(cells) {
      let price = cell.parse::<f64>().map_err(|_| {
        FrontierError::MalformedInput(format!("line {}: cannot parse '{cell}'", line_no + 1))
      })?;
      column.push(price);
    }
  }

  debug!(
    tickers = tickers.len(),
    rows = columns[0].len(),
    dropped,
    "parsed price table"
  );

  Ok(PriceTable { tickers, columns })
}

/// Serialized output of a frontier run.
#[derive(Debug, Serialize)]
pub struct FrontierReport<'a> {
  pub frontier: &'a [FrontierPoint],
  #[serde(skip_serializing_if = "Option::is_none")]
  pub portfolios: Option<&'a [SampledPortfolio]>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub single_assets: Option<&'a [AssetPoint]>,
}

impl<'a> FrontierReport<'a> {
  pub fn new(frontier: &'a [FrontierPoint]) -> Self {
    Self {
      frontier,
      portfolios: None,
      single_assets: None,
    }
  }

  pub fn with_cloud(mut self, portfolios: &'a [SampledPortfolio], assets: &'a [AssetPoint]) -> Self {
    self.portfolios = Some(portfolios);
    self.single_assets = Some(assets);
    self
  }

  /// Render as a single-line JSON object.
  pub fn to_json(&self) -> Result<String> {
    serde_json::to_string(self)
      .map_err(|err| FrontierError::Serialization(format!("cannot serialize report: {err}")))
  }
}
