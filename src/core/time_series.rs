//! Regular, gap-free demand series indexed by calendar period.

use crate::error::{PlannerError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spacing between consecutive periods of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    /// Calendar months, stepped from the anchor so month-end dates do not drift.
    Monthly,
    Quarterly,
    Yearly,
    /// Any other fixed spacing in days.
    Days(u32),
}

impl Granularity {
    /// Map a modal spacing in days to a granularity.
    pub fn from_spacing_days(days: i64) -> Self {
        match days {
            i64::MIN..=1 => Granularity::Daily,
            7 => Granularity::Weekly,
            28..=31 => Granularity::Monthly,
            89..=92 => Granularity::Quarterly,
            365..=366 => Granularity::Yearly,
            n => Granularity::Days(u32::try_from(n).unwrap_or(u32::MAX)),
        }
    }

    /// Approximate length of one period in days, used to rank granularities.
    pub fn nominal_days(&self) -> u32 {
        match self {
            Granularity::Daily => 1,
            Granularity::Weekly => 7,
            Granularity::Monthly => 30,
            Granularity::Quarterly => 91,
            Granularity::Yearly => 365,
            Granularity::Days(n) => *n,
        }
    }

    /// Period `index` steps after `anchor`.
    ///
    /// Returns `None` if the date would overflow the calendar.
    pub fn period_at(&self, anchor: NaiveDate, index: usize) -> Option<NaiveDate> {
        let index = u32::try_from(index).ok()?;
        match self {
            Granularity::Daily => anchor.checked_add_days(chrono::Days::new(index as u64)),
            Granularity::Weekly => anchor.checked_add_days(chrono::Days::new(7 * index as u64)),
            Granularity::Days(n) => {
                anchor.checked_add_days(chrono::Days::new((*n).max(1) as u64 * index as u64))
            }
            Granularity::Monthly => anchor.checked_add_months(Months::new(index)),
            Granularity::Quarterly => anchor.checked_add_months(Months::new(index.checked_mul(3)?)),
            Granularity::Yearly => anchor.checked_add_months(Months::new(index.checked_mul(12)?)),
        }
    }

    /// Index of the period containing `date` on the grid anchored at `anchor`.
    ///
    /// Month-based granularities bucket by calendar month, ignoring the day:
    /// with a month-end anchor, 2025-02-05 belongs to the period labelled
    /// 2025-02-28. `date` must not precede `anchor`.
    pub fn bucket_index(&self, anchor: NaiveDate, date: NaiveDate) -> usize {
        let days = (date - anchor).num_days().max(0) as usize;
        let months = {
            let diff = (date.year() - anchor.year()) * 12 + date.month() as i32
                - anchor.month() as i32;
            diff.max(0) as usize
        };
        match self {
            Granularity::Daily => days,
            Granularity::Weekly => days / 7,
            Granularity::Days(n) => days / (*n).max(1) as usize,
            Granularity::Monthly => months,
            Granularity::Quarterly => months / 3,
            Granularity::Yearly => months / 12,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Quarterly => write!(f, "quarterly"),
            Granularity::Yearly => write!(f, "yearly"),
            Granularity::Days(n) => write!(f, "every {} days", n),
        }
    }
}

/// A demand series with one non-negative value per period.
///
/// Periods are strictly increasing and lie on the grid defined by the first
/// period and the granularity, with no interior gaps. Once built the series
/// is never mutated; re-preparing data produces a new series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    periods: Vec<NaiveDate>,
    values: Vec<f64>,
    granularity: Granularity,
}

impl TimeSeries {
    /// Create a series, validating the period grid and the values.
    pub fn new(periods: Vec<NaiveDate>, values: Vec<f64>, granularity: Granularity) -> Result<Self> {
        if periods.is_empty() {
            return Err(PlannerError::Validation(
                "time series must contain at least one period".to_string(),
            ));
        }
        if periods.len() != values.len() {
            return Err(PlannerError::Validation(format!(
                "{} periods but {} values",
                periods.len(),
                values.len()
            )));
        }

        let anchor = periods[0];
        for (i, period) in periods.iter().enumerate().skip(1) {
            if *period <= periods[i - 1] {
                return Err(PlannerError::Validation(format!(
                    "periods must be strictly increasing: {} follows {}",
                    period,
                    periods[i - 1]
                )));
            }
            let expected = granularity.period_at(anchor, i);
            if expected != Some(*period) {
                return Err(PlannerError::Validation(format!(
                    "period {} breaks the {} grid starting at {}",
                    period, granularity, anchor
                )));
            }
        }

        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(PlannerError::Validation(format!(
                "demand at {} must be a non-negative number, got {}",
                periods[i], v
            )));
        }

        Ok(Self {
            periods,
            values,
            granularity,
        })
    }

    /// Create a series of consecutive periods starting at `start`.
    pub fn from_start(start: NaiveDate, granularity: Granularity, values: Vec<f64>) -> Result<Self> {
        let periods = (0..values.len())
            .map(|i| {
                granularity.period_at(start, i).ok_or_else(|| {
                    PlannerError::Validation(format!("period {} after {} is out of range", i, start))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(periods, values, granularity)
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn first_period(&self) -> NaiveDate {
        self.periods[0]
    }

    pub fn last_period(&self) -> NaiveDate {
        self.periods[self.periods.len() - 1]
    }

    /// Iterate over `(period, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.periods.iter().copied().zip(self.values.iter().copied())
    }

    /// The `horizon` periods immediately following the last period.
    pub fn future_periods(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        let anchor = self.first_period();
        (0..horizon)
            .map(|h| {
                self.granularity
                    .period_at(anchor, self.len() + h)
                    .ok_or_else(|| {
                        PlannerError::InvalidParameter(format!(
                            "horizon {} runs past the supported calendar range",
                            horizon
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn granularity_from_modal_spacing() {
        assert_eq!(Granularity::from_spacing_days(1), Granularity::Daily);
        assert_eq!(Granularity::from_spacing_days(7), Granularity::Weekly);
        assert_eq!(Granularity::from_spacing_days(28), Granularity::Monthly);
        assert_eq!(Granularity::from_spacing_days(31), Granularity::Monthly);
        assert_eq!(Granularity::from_spacing_days(91), Granularity::Quarterly);
        assert_eq!(Granularity::from_spacing_days(365), Granularity::Yearly);
        assert_eq!(Granularity::from_spacing_days(3), Granularity::Days(3));
    }

    #[test]
    fn monthly_steps_from_anchor_without_drift() {
        let anchor = date(2025, 1, 31);
        let g = Granularity::Monthly;
        assert_eq!(g.period_at(anchor, 1), Some(date(2025, 2, 28)));
        assert_eq!(g.period_at(anchor, 2), Some(date(2025, 3, 31)));
        assert_eq!(g.period_at(anchor, 12), Some(date(2026, 1, 31)));
    }

    #[test]
    fn bucket_index_by_granularity() {
        let anchor = date(2025, 1, 6);
        assert_eq!(Granularity::Daily.bucket_index(anchor, date(2025, 1, 9)), 3);
        assert_eq!(Granularity::Weekly.bucket_index(anchor, date(2025, 1, 19)), 1);
        assert_eq!(Granularity::Monthly.bucket_index(anchor, date(2025, 3, 1)), 2);
        assert_eq!(Granularity::Quarterly.bucket_index(anchor, date(2025, 7, 1)), 2);
        assert_eq!(Granularity::Days(3).bucket_index(anchor, date(2025, 1, 13)), 2);
    }

    #[test]
    fn month_end_anchor_buckets_by_calendar_month() {
        let anchor = date(2025, 1, 31);
        let index = Granularity::Monthly.bucket_index(anchor, date(2025, 2, 5));
        assert_eq!(index, 1);
        assert_eq!(Granularity::Monthly.period_at(anchor, index), Some(date(2025, 2, 28)));
        assert_eq!(Granularity::Quarterly.bucket_index(anchor, date(2025, 4, 1)), 1);
    }

    #[test]
    fn series_rejects_non_increasing_periods() {
        let result = TimeSeries::new(
            vec![date(2025, 1, 2), date(2025, 1, 1)],
            vec![1.0, 2.0],
            Granularity::Daily,
        );
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[test]
    fn series_rejects_interior_gaps() {
        let result = TimeSeries::new(
            vec![date(2025, 1, 1), date(2025, 1, 3)],
            vec![1.0, 2.0],
            Granularity::Daily,
        );
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[test]
    fn series_rejects_negative_or_nan_demand() {
        let start = date(2025, 1, 1);
        assert!(TimeSeries::from_start(start, Granularity::Daily, vec![1.0, -1.0]).is_err());
        assert!(TimeSeries::from_start(start, Granularity::Daily, vec![1.0, f64::NAN]).is_err());
        assert!(TimeSeries::from_start(start, Granularity::Daily, vec![]).is_err());
    }

    #[test]
    fn series_rejects_length_mismatch() {
        let result = TimeSeries::new(vec![date(2025, 1, 1)], vec![1.0, 2.0], Granularity::Daily);
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[test]
    fn future_periods_continue_the_grid() {
        let ts = TimeSeries::from_start(date(2025, 1, 31), Granularity::Monthly, vec![1.0, 2.0, 3.0])
            .unwrap();
        assert_eq!(ts.last_period(), date(2025, 3, 31));
        let future = ts.future_periods(2).unwrap();
        assert_eq!(future, vec![date(2025, 4, 30), date(2025, 5, 31)]);
    }

    #[test]
    fn iter_yields_pairs_in_order() {
        let ts = TimeSeries::from_start(date(2025, 1, 1), Granularity::Weekly, vec![4.0, 5.0]).unwrap();
        let pairs: Vec<_> = ts.iter().collect();
        assert_eq!(pairs, vec![(date(2025, 1, 1), 4.0), (date(2025, 1, 8), 5.0)]);
        assert_eq!(ts.granularity(), Granularity::Weekly);
    }
}
