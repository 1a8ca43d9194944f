//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Analytic mean-variance efficient frontier with short selling allowed.

pub mod cloud;
pub mod data;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod io;
pub mod kkt;
pub mod problem;
pub mod risk;
pub mod types;

pub use cloud::single_asset_points;
pub use cloud::PortfolioCloud;
pub use data::annualized_moments;
pub use data::sample_covariance;
pub use data::simple_returns_series;
pub use data::TRADING_DAYS;
pub use error::FrontierError;
pub use error::Result;
pub use frontier::FrontierConfig;
pub use frontier::FrontierSolver;
pub use grid::target_grid;
pub use io::parse_price_table;
pub use io::parse_problem;
pub use io::FrontierReport;
pub use io::PriceTable;
pub use kkt::assemble_kkt_matrix;
pub use kkt::KktForm;
pub use kkt::KktSolution;
pub use kkt::KktSystem;
pub use problem::FrontierProblem;
pub use risk::portfolio_return;
pub use risk::portfolio_risk;
pub use risk::portfolio_variance;
pub use types::AssetPoint;
pub use types::FrontierPoint;
pub use types::SampledPortfolio;
pub use types::SolverMethod;
