//! Turning an uploaded table into a regular demand series.
//!
//! Preparation runs in four steps:
//! 1. parse the date column, dropping rows whose date cannot be read,
//! 2. coerce the value column to non-negative numbers,
//! 3. infer the period granularity from the modal spacing of distinct dates,
//! 4. bucket rows onto the period grid, aggregate each bucket and fill empty
//!    periods with zero demand.

mod aggregation;
mod cells;

pub use aggregation::Aggregation;

use crate::core::{Granularity, RawTable, TimeSeries};
use crate::error::{PlannerError, Result};
use cells::{parse_date, parse_demand, DemandCell};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Counts describing what preparation did to the raw rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreparationReport {
    /// Rows in the raw table.
    pub rows_read: usize,
    /// Rows dropped because the date could not be parsed.
    pub unparseable_dates: usize,
    /// Dated rows dropped because the value cell was empty.
    pub missing_values: usize,
    /// Periods with no rows, filled with zero demand.
    pub filled_periods: usize,
}

impl PreparationReport {
    /// Total rows excluded from the series.
    pub fn dropped_rows(&self) -> usize {
        self.unparseable_dates + self.missing_values
    }
}

/// A prepared series together with its preparation report.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    pub series: TimeSeries,
    pub report: PreparationReport,
}

/// Prepare a demand series from `table`.
///
/// # Errors
/// [`PlannerError::Validation`] when a column is missing, the table is empty,
/// a value cannot be coerced to a non-negative number, or fewer than two
/// distinct valid periods remain.
pub fn prepare(
    table: &RawTable,
    date_column: &str,
    value_column: &str,
    aggregation: Aggregation,
) -> Result<PreparedSeries> {
    for column in [date_column, value_column] {
        if !table.has_column(column) {
            return Err(PlannerError::Validation(format!(
                "column '{}' not found; available columns: {}",
                column,
                table.columns().join(", ")
            )));
        }
    }
    if table.is_empty() {
        return Err(PlannerError::Validation("table has no rows".to_string()));
    }

    let mut report = PreparationReport {
        rows_read: table.len(),
        ..Default::default()
    };
    let mut observations: Vec<(NaiveDate, f64)> = Vec::with_capacity(table.len());

    for (index, row) in table.rows().iter().enumerate() {
        let Some(date) = row.get(date_column).and_then(parse_date) else {
            report.unparseable_dates += 1;
            continue;
        };
        let cell = row.get(value_column).cloned().unwrap_or_default();
        match parse_demand(&cell) {
            DemandCell::Value(v) => observations.push((date, v)),
            DemandCell::Missing => report.missing_values += 1,
            DemandCell::Invalid(shown) => {
                return Err(PlannerError::Validation(format!(
                    "column '{}' row {}: {} is not a non-negative number",
                    value_column, index, shown
                )));
            }
        }
    }

    if report.unparseable_dates > 0 {
        tracing::warn!(
            column = date_column,
            dropped = report.unparseable_dates,
            "dropped rows with unparseable dates"
        );
    }
    if report.missing_values > 0 {
        tracing::warn!(
            column = value_column,
            dropped = report.missing_values,
            "dropped rows with missing demand"
        );
    }

    let mut dates: Vec<NaiveDate> = observations.iter().map(|(d, _)| *d).collect();
    dates.sort_unstable();
    dates.dedup();
    if dates.len() < 2 {
        return Err(PlannerError::Validation(format!(
            "need at least 2 distinct valid periods, found {} ({} of {} rows dropped)",
            dates.len(),
            report.dropped_rows(),
            report.rows_read
        )));
    }

    let granularity = infer_granularity(&dates);
    let anchor = dates[0];
    let last_bucket = granularity.bucket_index(anchor, dates[dates.len() - 1]);
    tracing::debug!(%granularity, %anchor, periods = last_bucket + 1, "inferred period grid");
    if last_bucket == 0 {
        return Err(PlannerError::Validation(format!(
            "all valid dates fall into a single {} period",
            granularity
        )));
    }

    let mut buckets: HashMap<usize, Vec<f64>> = HashMap::new();
    for (date, value) in &observations {
        buckets
            .entry(granularity.bucket_index(anchor, *date))
            .or_default()
            .push(*value);
    }

    let values: Vec<f64> = (0..=last_bucket)
        .map(|i| match buckets.get(&i) {
            Some(vals) => aggregation.apply(vals),
            None => {
                report.filled_periods += 1;
                0.0
            }
        })
        .collect();

    if report.filled_periods > 0 {
        tracing::warn!(
            filled = report.filled_periods,
            "filled periods without rows with zero demand"
        );
    }

    let series = TimeSeries::from_start(anchor, granularity, values)?;
    tracing::info!(
        periods = series.len(),
        %granularity,
        dropped = report.dropped_rows(),
        "prepared demand series"
    );

    Ok(PreparedSeries { series, report })
}

/// Granularity implied by the modal spacing of sorted distinct dates.
///
/// Each gap is classified first, so 28, 30 and 31 day gaps all count towards
/// monthly. Ties go to the finer granularity.
pub fn infer_granularity(dates: &[NaiveDate]) -> Granularity {
    let mut counts: HashMap<Granularity, usize> = HashMap::new();
    for w in dates.windows(2) {
        let gap = Granularity::from_spacing_days((w[1] - w[0]).num_days());
        *counts.entry(gap).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(ga, ca), (gb, cb)| ca.cmp(cb).then(gb.nominal_days().cmp(&ga.nominal_days())))
        .map(|(granularity, _)| granularity)
        .unwrap_or_default()
}
