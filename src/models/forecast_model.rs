//! Runtime model selection.

use crate::core::{ForecastResult, TimeSeries};
use crate::error::{PlannerError, Result};
use crate::models::arima::{ArimaOrder, ARIMA};
use crate::models::exponential::{HoltLinearTrend, HoltWinters, SimpleExponentialSmoothing};
use crate::models::BoxedForecaster;
use serde::{Deserialize, Serialize};

/// Exponential smoothing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtsParams {
    /// Add an additive seasonal component.
    pub seasonal: bool,
    /// Season length in periods; used only when `seasonal` is set.
    pub seasonal_periods: usize,
    /// Add an additive trend component.
    pub trend: bool,
}

impl Default for EtsParams {
    fn default() -> Self {
        Self {
            seasonal: false,
            seasonal_periods: 7,
            trend: true,
        }
    }
}

/// Forecasting strategy chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastModel {
    /// Additive exponential smoothing: SES, Holt or Holt-Winters depending on
    /// the trend and seasonal flags.
    ExponentialSmoothing(EtsParams),
    Arima(ArimaOrder),
}

impl Default for ForecastModel {
    fn default() -> Self {
        ForecastModel::ExponentialSmoothing(EtsParams::default())
    }
}

impl ForecastModel {
    /// Fewest observations the selected engine accepts.
    pub fn min_observations(&self) -> usize {
        match self {
            ForecastModel::ExponentialSmoothing(p) if p.seasonal => {
                p.seasonal_periods.saturating_mul(2).max(2)
            }
            ForecastModel::ExponentialSmoothing(_) => 2,
            ForecastModel::Arima(order) => order.min_observations(),
        }
    }

    fn engine(&self) -> BoxedForecaster {
        match *self {
            ForecastModel::ExponentialSmoothing(p) if p.seasonal => {
                Box::new(HoltWinters::auto(p.seasonal_periods))
            }
            ForecastModel::ExponentialSmoothing(p) if p.trend => Box::new(HoltLinearTrend::auto()),
            ForecastModel::ExponentialSmoothing(_) => Box::new(SimpleExponentialSmoothing::auto()),
            ForecastModel::Arima(order) => Box::new(ARIMA::from_order(order)),
        }
    }

    /// Fit the selected model to `series` and forecast `horizon` periods
    /// past its last period.
    ///
    /// # Errors
    /// - [`PlannerError::InvalidParameter`] for a zero horizon or zero
    ///   seasonal period.
    /// - [`PlannerError::InsufficientData`] when the series is too short.
    /// - [`PlannerError::ModelFit`] when estimation fails or produces
    ///   non-finite output.
    ///
    /// # Example
    /// ```
    /// use demand_planner::core::{Granularity, TimeSeries};
    /// use demand_planner::models::{EtsParams, ForecastModel};
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    /// let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    /// let series = TimeSeries::from_start(start, Granularity::Daily, values).unwrap();
    ///
    /// let model = ForecastModel::ExponentialSmoothing(EtsParams::default());
    /// let result = model.fit_and_forecast(&series, 7).unwrap();
    /// assert_eq!(result.horizon(), 7);
    /// assert_eq!(result.fitted().len(), 30);
    /// ```
    pub fn fit_and_forecast(&self, series: &TimeSeries, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(PlannerError::InvalidParameter(
                "forecast horizon must be at least 1".to_string(),
            ));
        }

        let mut engine = self.engine();
        engine.fit(series)?;
        let forecast = engine.predict(horizon)?;
        let fitted = engine.fitted_values().ok_or_else(|| {
            PlannerError::ModelFit(format!("{} produced no fitted values", engine.name()))
        })?;

        if forecast.iter().chain(fitted).any(|v| !v.is_finite()) {
            return Err(PlannerError::ModelFit(format!(
                "{} produced non-finite values",
                engine.name()
            )));
        }

        tracing::info!(
            model = engine.name(),
            observations = series.len(),
            horizon,
            "forecast complete"
        );

        ForecastResult::from_values(engine.name(), series, fitted, &forecast)
    }
}
