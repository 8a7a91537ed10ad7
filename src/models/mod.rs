//! Forecasting models.

mod forecast_model;
mod traits;

pub mod arima;
pub mod exponential;

pub use arima::ArimaOrder;
pub use forecast_model::{EtsParams, ForecastModel};
pub use traits::{BoxedForecaster, Forecaster};
