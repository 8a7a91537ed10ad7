//! Core data structures for demand planning.

mod forecast;
mod raw_table;
mod time_series;

pub use forecast::{ForecastPoint, ForecastResult};
pub use raw_table::{CellValue, RawTable, Row};
pub use time_series::{Granularity, TimeSeries};
