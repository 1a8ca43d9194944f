//! # Quant
//!
//! Portfolio construction from estimated return moments.

pub mod portfolio;
