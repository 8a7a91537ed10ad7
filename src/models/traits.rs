//! Forecaster trait shared by the concrete model engines.

use crate::core::TimeSeries;
use crate::error::Result;

/// Common interface of the smoothing and ARIMA engines.
///
/// Callers normally go through [`ForecastModel`](crate::models::ForecastModel),
/// which picks an engine, fits it and attaches periods to its output.
pub trait Forecaster {
    /// Fit the model to the series.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Point forecasts for the next `horizon` periods.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample one-step predictions, one per historical period.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Actual minus fitted, one per historical period.
    fn residuals(&self) -> Option<&[f64]>;

    /// Human-readable model name.
    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Boxed engine chosen at runtime.
pub type BoxedForecaster = Box<dyn Forecaster>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Granularity;
    use crate::error::PlannerError;
    use crate::models::arima::ARIMA;
    use crate::models::exponential::{HoltLinearTrend, SimpleExponentialSmoothing};
    use chrono::NaiveDate;

    fn make_series(n: usize) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let values: Vec<f64> = (1..=n).map(|i| 20.0 + i as f64 + (i % 3) as f64).collect();
        TimeSeries::from_start(start, Granularity::Daily, values).unwrap()
    }

    #[test]
    fn boxed_engines_fit_and_predict() {
        let ts = make_series(30);
        let engines: Vec<BoxedForecaster> = vec![
            Box::new(SimpleExponentialSmoothing::auto()),
            Box::new(HoltLinearTrend::auto()),
            Box::new(ARIMA::new(1, 1, 0)),
        ];

        for mut engine in engines {
            assert!(!engine.is_fitted());
            engine.fit(&ts).unwrap();
            assert!(engine.is_fitted());
            assert_eq!(engine.fitted_values().unwrap().len(), 30);
            assert_eq!(engine.residuals().unwrap().len(), 30);
            assert_eq!(engine.predict(4).unwrap().len(), 4);
        }
    }

    #[test]
    fn predict_before_fit_fails() {
        let engine: BoxedForecaster = Box::new(HoltLinearTrend::auto());
        assert!(matches!(engine.predict(3), Err(PlannerError::ModelFit(_))));
    }
}
