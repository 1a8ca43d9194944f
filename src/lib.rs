//! # markowitz-frontier
//!
//! $$
//! \min_{\mathbf{w}} \mathbf{w}^\top \Sigma \mathbf{w}
//! \quad \text{s.t.}\quad \mathbf{w}^\top\mu = R,\ \mathbf{w}^\top\mathbf{1} = 1
//! $$
//!
//! Efficient frontier sampling through the KKT system of the equality
//! constrained Markowitz problem.

pub mod quant;
