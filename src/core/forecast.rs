//! Forecast result handed to the rendering layer.

use crate::core::TimeSeries;
use crate::error::{PlannerError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// A single dated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub period: NaiveDate,
    pub value: f64,
}

/// In-sample fit and out-of-sample projection of a model.
///
/// `fitted` covers the historical periods one-to-one; `forecast` covers the
/// `horizon` periods that follow the last historical period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    model: String,
    fitted: Vec<ForecastPoint>,
    forecast: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Attach periods from `series` to raw fitted and forecast values.
    pub fn from_values(
        model: impl Into<String>,
        series: &TimeSeries,
        fitted: &[f64],
        forecast: &[f64],
    ) -> Result<Self> {
        if fitted.len() != series.len() {
            return Err(PlannerError::ModelFit(format!(
                "model produced {} fitted values for {} periods",
                fitted.len(),
                series.len()
            )));
        }

        let fitted = series
            .periods()
            .iter()
            .zip(fitted)
            .map(|(&period, &value)| ForecastPoint { period, value })
            .collect();
        let forecast = series
            .future_periods(forecast.len())?
            .into_iter()
            .zip(forecast)
            .map(|(period, &value)| ForecastPoint { period, value })
            .collect();

        Ok(Self {
            model: model.into(),
            fitted,
            forecast,
        })
    }

    /// Name of the model that produced this result.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn fitted(&self) -> &[ForecastPoint] {
        &self.fitted
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    /// Number of forecast periods.
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }

    /// Forecast values without their periods.
    pub fn forecast_values(&self) -> Vec<f64> {
        self.forecast.iter().map(|p| p.value).collect()
    }

    pub fn fitted_values(&self) -> Vec<f64> {
        self.fitted.iter().map(|p| p.value).collect()
    }
}
