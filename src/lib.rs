//! # demand-planner
//!
//! Demand forecasting and inventory planning.
//!
//! The pipeline turns an uploaded table into a regular demand series
//! ([`prepare`]), fits an exponential smoothing or ARIMA model
//! ([`models::ForecastModel`]) and derives safety stock, reorder point and
//! EOQ ([`inventory`]). [`session::PlanningSession`] chains the steps for a
//! caller that keeps state between them.
//!
//! The library emits `tracing` events but never installs a subscriber.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod error;
pub mod inventory;
pub mod models;
pub mod prepare;
pub mod session;
pub mod utils;

pub use error::{PlannerError, Result};

pub mod prelude {
    pub use crate::config::{DemandBasis, ModelKind, PlannerConfig};
    pub use crate::core::{CellValue, ForecastResult, Granularity, RawTable, TimeSeries};
    pub use crate::error::{PlannerError, Result};
    pub use crate::inventory::{InventoryCalculator, InventoryMetrics, InventoryParams};
    pub use crate::models::{ArimaOrder, EtsParams, ForecastModel};
    pub use crate::prepare::{prepare, Aggregation, PreparedSeries};
    pub use crate::session::PlanningSession;
}
