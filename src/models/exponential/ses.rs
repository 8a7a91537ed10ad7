//! Simple Exponential Smoothing (SES).
//!
//! Suited to demand with no clear trend or seasonality.

use crate::core::TimeSeries;
use crate::error::{PlannerError, Result};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Simple Exponential Smoothing forecaster.
///
/// The model equation is:
/// `level_t = α × y_t + (1-α) × level_{t-1}`
///
/// # Example
/// ```
/// use demand_planner::core::{Granularity, TimeSeries};
/// use demand_planner::models::exponential::SimpleExponentialSmoothing;
/// use demand_planner::models::Forecaster;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let values = vec![10.0, 12.0, 11.0, 13.0, 12.0, 14.0, 13.0, 15.0, 14.0, 16.0];
/// let ts = TimeSeries::from_start(start, Granularity::Daily, values).unwrap();
///
/// let mut model = SimpleExponentialSmoothing::new(0.3);
/// model.fit(&ts).unwrap();
///
/// let forecast = model.predict(3).unwrap();
/// assert_eq!(forecast.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleExponentialSmoothing {
    /// Smoothing parameter (0 < alpha < 1).
    alpha: Option<f64>,
    optimize: bool,
    level: Option<f64>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl SimpleExponentialSmoothing {
    pub const MIN_OBSERVATIONS: usize = 2;

    /// Create a new SES model with a fixed smoothing parameter.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha.clamp(0.0001, 0.9999)),
            optimize: false,
            level: None,
            fitted: None,
            residuals: None,
        }
    }

    /// Create a new SES model whose alpha minimises the in-sample SSE.
    pub fn auto() -> Self {
        Self {
            alpha: None,
            optimize: true,
            level: None,
            fitted: None,
            residuals: None,
        }
    }

    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn level(&self) -> Option<f64> {
        self.level
    }

    fn calculate_sse(values: &[f64], alpha: f64) -> f64 {
        let mut level = values[0];
        let mut sse = 0.0;

        for &y in &values[1..] {
            let error = y - level;
            sse += error * error;
            level = alpha * y + (1.0 - alpha) * level;
        }

        sse
    }

    fn optimize_alpha(values: &[f64]) -> f64 {
        let config = NelderMeadConfig {
            max_iter: 500,
            ..Default::default()
        };

        let result = nelder_mead(
            |params| Self::calculate_sse(values, params[0]),
            &[0.5],
            Some(&[(0.0001, 0.9999)]),
            config,
        );

        result.optimal_point[0].clamp(0.0001, 0.9999)
    }
}

impl Default for SimpleExponentialSmoothing {
    fn default() -> Self {
        Self::auto()
    }
}

impl Forecaster for SimpleExponentialSmoothing {
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
            self.alpha = Some(Self::optimize_alpha(values));
        }
        let alpha = self
            .alpha
            .ok_or_else(|| PlannerError::ModelFit("smoothing parameter missing".to_string()))?;

        tracing::debug!(alpha, optimized = self.optimize, "SES smoothing parameter");

        let mut level = values[0];
        let mut fitted = Vec::with_capacity(values.len());
        let mut residuals = Vec::with_capacity(values.len());

        fitted.push(level);
        residuals.push(0.0);

        for &y in &values[1..] {
            fitted.push(level);
            residuals.push(y - level);
            level = alpha * y + (1.0 - alpha) * level;
        }

        self.level = Some(level);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let level = self.level.ok_or_else(|| {
            PlannerError::ModelFit("SES must be fitted before predicting".to_string())
        })?;

        // Flat forecast at the final level
        Ok(vec![level; horizon])
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SES"
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
    fn ses_constant_series() {
        let ts = make_series(vec![5.0; 10]);

        let mut model = SimpleExponentialSmoothing::new(0.3);
        model.fit(&ts).unwrap();

        let forecast = model.predict(5).unwrap();
        for v in forecast {
            assert_relative_eq!(v, 5.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn ses_level_update_by_hand() {
        let ts = make_series(vec![10.0, 20.0, 15.0]);

        let mut model = SimpleExponentialSmoothing::new(0.5);
        model.fit(&ts).unwrap();

        // 10 -> 15 -> 15
        assert_relative_eq!(model.level().unwrap(), 15.0, epsilon = 1e-10);
        let fitted = model.fitted_values().unwrap();
        assert_eq!(fitted, &[10.0, 10.0, 15.0]);
        let residuals = model.residuals().unwrap();
        assert_eq!(residuals, &[0.0, 10.0, 0.0]);
    }

    #[test]
    fn ses_auto_tracks_level_shift() {
        let mut values = vec![10.0; 10];
        values.extend(vec![50.0; 10]);
        let ts = make_series(values);

        let mut model = SimpleExponentialSmoothing::auto();
        model.fit(&ts).unwrap();

        let alpha = model.alpha().unwrap();
        assert!(alpha > 0.5, "alpha was {}", alpha);
        assert_relative_eq!(model.predict(1).unwrap()[0], 50.0, epsilon = 0.5);
    }

    #[test]
    fn ses_needs_two_observations() {
        let ts = make_series(vec![3.0]);
        let mut model = SimpleExponentialSmoothing::auto();
        assert!(matches!(
            model.fit(&ts),
            Err(PlannerError::InsufficientData { needed: 2, got: 1, .. })
        ));
    }

    #[test]
    fn ses_requires_fit_before_predict() {
        let model = SimpleExponentialSmoothing::new(0.3);
        assert!(model.predict(3).is_err());
    }
}
