//! Numerical utilities shared by the models and the inventory calculator.

pub mod optimization;
pub mod stats;

pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::normal_quantile;
