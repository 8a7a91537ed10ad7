//! Holt's Linear Trend forecasting model.
//!
//! Also known as double exponential smoothing, this model suits demand with a
//! linear trend but no seasonality.

use crate::core::TimeSeries;
use crate::error::{PlannerError, Result};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Holt's Linear Trend forecaster.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
/// - Forecast: `ŷ_{t+h} = l_t + h × b_t`
///
/// The state starts at `l_0 = y_0`, `b_0 = y_1 - y_0`.
#[derive(Debug, Clone)]
pub struct HoltLinearTrend {
    /// Level smoothing parameter (0 < alpha < 1).
    alpha: Option<f64>,
    /// Trend smoothing parameter (0 < beta < 1).
    beta: Option<f64>,
    optimize: bool,
    level: Option<f64>,
    trend: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl HoltLinearTrend {
    pub const MIN_OBSERVATIONS: usize = 2;

    /// Create a new Holt model with fixed parameters.
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: Some(alpha.clamp(0.0001, 0.9999)),
            beta: Some(beta.clamp(0.0001, 0.9999)),
            optimize: false,
            level: None,
            trend: None,
            fitted: None,
            residuals: None,
        }
    }

    /// Create a new Holt model with alpha and beta chosen by SSE.
    pub fn auto() -> Self {
        Self {
            alpha: None,
            beta: None,
            optimize: true,
            level: None,
            trend: None,
            fitted: None,
            residuals: None,
        }
    }

    pub fn trend(&self) -> Option<f64> {
        self.trend
    }

    /// Run the recursions, returning the final state and the one-step
    /// predictions.
    fn smooth(values: &[f64], alpha: f64, beta: f64) -> (f64, f64, Vec<f64>) {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(values[0]);

        for &y in &values[1..] {
            fitted.push(level + trend);
            let level_prev = level;
            level = alpha * y + (1.0 - alpha) * (level_prev + trend);
            trend = beta * (level - level_prev) + (1.0 - beta) * trend;
        }

        (level, trend, fitted)
    }

    fn calculate_sse(values: &[f64], alpha: f64, beta: f64) -> f64 {
        let (_, _, fitted) = Self::smooth(values, alpha, beta);
        values
            .iter()
            .zip(&fitted)
            .skip(1)
            .map(|(y, f)| (y - f).powi(2))
            .sum()
    }

    fn optimize_params(values: &[f64]) -> (f64, f64) {
        let config = NelderMeadConfig {
            max_iter: 1000,
            ..Default::default()
        };

        let result = nelder_mead(
            |params| Self::calculate_sse(values, params[0], params[1]),
            &[0.3, 0.1],
            Some(&[(0.0001, 0.9999), (0.0001, 0.9999)]),
            config,
        );

        (
            result.optimal_point[0].clamp(0.0001, 0.9999),
            result.optimal_point[1].clamp(0.0001, 0.9999),
        )
    }
}

impl Default for HoltLinearTrend {
    fn default() -> Self {
        Self::auto()
    }
}

impl Forecaster for HoltLinearTrend {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        if values.len() < Self::MIN_OBSERVATIONS {
            return Err(PlannerError::insufficient(
                self.name(),
                Self::MIN_OBSERVATIONS,
                values.len(),
            ));
        }

        if self.optimize {
            let (alpha, beta) = Self::optimize_params(values);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
        }
        let (alpha, beta) = self
            .alpha
            .zip(self.beta)
            .ok_or_else(|| PlannerError::ModelFit("smoothing parameters missing".to_string()))?;

        tracing::debug!(alpha, beta, optimized = self.optimize, "Holt smoothing parameters");

        let (level, trend, fitted) = Self::smooth(values, alpha, beta);
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.level = Some(level);
        self.trend = Some(trend);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let (level, trend) = self.level.zip(self.trend).ok_or_else(|| {
            PlannerError::ModelFit("Holt must be fitted before predicting".to_string())
        })?;

        Ok((1..=horizon).map(|h| level + h as f64 * trend).collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "Holt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Granularity;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TimeSeries::from_start(start, Granularity::Daily, values).unwrap()
    }

    #[test]
    fn holt_extends_exact_linear_trend() {
        let values: Vec<f64> = (0..20).map(|i| 10.0 + 2.0 * i as f64).collect();
        let ts = make_series(values);

        let mut model = HoltLinearTrend::new(0.5, 0.3);
        model.fit(&ts).unwrap();

        let forecast = model.predict(3).unwrap();
        assert_relative_eq!(forecast[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(forecast[1], 52.0, epsilon = 1e-9);
        assert_relative_eq!(forecast[2], 54.0, epsilon = 1e-9);
    }

    #[test]
    fn holt_auto_follows_noisy_trend() {
        let values: Vec<f64> = (0..40)
            .map(|i| 100.0 + 3.0 * i as f64 + if i % 2 == 0 { 2.0 } else { -2.0 })
            .collect();
        let ts = make_series(values);

        let mut model = HoltLinearTrend::auto();
        model.fit(&ts).unwrap();

        let trend = model.trend().unwrap();
        assert!(trend > 1.5 && trend < 4.5, "trend was {}", trend);

        let forecast = model.predict(5).unwrap();
        assert!(forecast[4] > forecast[0]);
    }

    #[test]
    fn holt_fitted_covers_every_period() {
        let ts = make_series(vec![5.0, 7.0, 6.0, 9.0]);
        let mut model = HoltLinearTrend::auto();
        model.fit(&ts).unwrap();

        assert_eq!(model.fitted_values().unwrap().len(), 4);
        assert_eq!(model.residuals().unwrap()[0], 0.0);
    }

    #[test]
    fn holt_two_observations_is_enough() {
        let ts = make_series(vec![10.0, 12.0]);
        let mut model = HoltLinearTrend::auto();
        model.fit(&ts).unwrap();
        let forecast = model.predict(2).unwrap();
        assert_relative_eq!(forecast[0], 14.0, epsilon = 1e-9);
        assert_relative_eq!(forecast[1], 16.0, epsilon = 1e-9);
    }

    #[test]
    fn holt_rejects_single_observation() {
        let ts = make_series(vec![10.0]);
        let mut model = HoltLinearTrend::auto();
        assert!(matches!(
            model.fit(&ts),
            Err(PlannerError::InsufficientData { .. })
        ));
    }
}
