//! ARIMA (Autoregressive Integrated Moving Average) model and the
//! differencing helpers it relies on.

mod diff;
mod model;

pub use diff::{difference, integrate};
pub use model::{ArimaOrder, ARIMA};
