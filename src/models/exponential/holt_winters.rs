//! Additive Holt-Winters seasonal forecasting model.

use crate::core::TimeSeries;
use crate::error::{PlannerError, Result};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Holt-Winters forecaster with additive trend and additive seasonality.
///
/// The model equations are:
/// - Level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
/// - Forecast: `ŷ_{t+h} = l_t + h×b_t + s_{t+h-m}`
///
/// The first full season initialises the state, so its fitted values echo
/// the observations.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    alpha: Option<f64>,
    beta: Option<f64>,
    gamma: Option<f64>,
    seasonal_period: usize,
    optimize: bool,
    level: Option<f64>,
    trend: Option<f64>,
    seasonals: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    n: usize,
}

/// Final smoothing state plus one-step predictions.
struct Smoothed {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
}

impl HoltWinters {
    /// Create a model with fixed smoothing parameters.
    pub fn new(alpha: f64, beta: f64, gamma: f64, seasonal_period: usize) -> Self {
        Self {
            alpha: Some(alpha.clamp(0.0001, 0.9999)),
            beta: Some(beta.clamp(0.0001, 0.9999)),
            gamma: Some(gamma.clamp(0.0001, 0.9999)),
            seasonal_period,
            optimize: false,
            level: None,
            trend: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            n: 0,
        }
    }

    /// Create a model whose parameters minimise the in-sample SSE.
    pub fn auto(seasonal_period: usize) -> Self {
        Self {
            alpha: None,
            beta: None,
            gamma: None,
            optimize: true,
            ..Self::new(0.3, 0.1, 0.1, seasonal_period)
        }
    }

    /// Minimum history: two full seasons.
    pub fn min_observations(&self) -> usize {
        self.seasonal_period.saturating_mul(2)
    }

    /// Initial level, trend and seasonal indices from the first two seasons.
    fn initialize_state(values: &[f64], period: usize) -> (f64, f64, Vec<f64>) {
        let first_season = &values[..period];
        let level = first_season.iter().sum::<f64>() / period as f64;

        let trend = (0..period)
            .map(|i| (values[period + i] - values[i]) / period as f64)
            .sum::<f64>()
            / period as f64;

        let mut seasonals: Vec<f64> = first_season.iter().map(|y| y - level).collect();
        // Seasonal indices sum to zero
        let adjustment = seasonals.iter().sum::<f64>() / period as f64;
        seasonals.iter_mut().for_each(|s| *s -= adjustment);

        (level, trend, seasonals)
    }

    fn smooth(values: &[f64], alpha: f64, beta: f64, gamma: f64, period: usize) -> Smoothed {
        let (mut level, mut trend, mut seasonals) = Self::initialize_state(values, period);

        let mut fitted = Vec::with_capacity(values.len());
        fitted.extend_from_slice(&values[..period]);

        for (t, &y) in values.iter().enumerate().skip(period) {
            let season_idx = t % period;
            let s = seasonals[season_idx];
            fitted.push(level + trend + s);

            let level_prev = level;
            level = alpha * (y - s) + (1.0 - alpha) * (level_prev + trend);
            trend = beta * (level - level_prev) + (1.0 - beta) * trend;
            seasonals[season_idx] = gamma * (y - level) + (1.0 - gamma) * s;
        }

        Smoothed {
            level,
            trend,
            seasonals,
            fitted,
        }
    }

    fn calculate_sse(values: &[f64], alpha: f64, beta: f64, gamma: f64, period: usize) -> f64 {
        let smoothed = Self::smooth(values, alpha, beta, gamma, period);
        values
            .iter()
            .zip(&smoothed.fitted)
            .skip(period)
            .map(|(y, f)| (y - f).powi(2))
            .sum()
    }

    fn optimize_params(values: &[f64], period: usize) -> (f64, f64, f64) {
        let config = NelderMeadConfig {
            max_iter: 1000,
            ..Default::default()
        };

        let result = nelder_mead(
            |params| Self::calculate_sse(values, params[0], params[1], params[2], period),
            &[0.3, 0.1, 0.1],
            Some(&[(0.0001, 0.9999), (0.0001, 0.9999), (0.0001, 0.9999)]),
            config,
        );

        (
            result.optimal_point[0].clamp(0.0001, 0.9999),
            result.optimal_point[1].clamp(0.0001, 0.9999),
            result.optimal_point[2].clamp(0.0001, 0.9999),
        )
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        if self.seasonal_period == 0 {
            return Err(PlannerError::InvalidParameter(
                "seasonal period must be at least 1".to_string(),
            ));
        }
        let values = series.values();
        let needed = self.min_observations().max(2);
        if values.len() < needed {
            return Err(PlannerError::insufficient(self.name(), needed, values.len()));
        }

        let period = self.seasonal_period;
        self.n = values.len();

        if self.optimize {
            let (alpha, beta, gamma) = Self::optimize_params(values, period);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
            self.gamma = Some(gamma);
        }

        let (alpha, beta, gamma) = match (self.alpha, self.beta, self.gamma) {
            (Some(a), Some(b), Some(g)) => (a, b, g),
            _ => {
                return Err(PlannerError::ModelFit(
                    "smoothing parameters missing".to_string(),
                ))
            }
        };

        tracing::debug!(alpha, beta, gamma, period, "Holt-Winters smoothing parameters");

        let smoothed = Self::smooth(values, alpha, beta, gamma, period);
        let residuals = values
            .iter()
            .zip(&smoothed.fitted)
            .map(|(y, f)| y - f)
            .collect();

        self.level = Some(smoothed.level);
        self.trend = Some(smoothed.trend);
        self.seasonals = Some(smoothed.seasonals);
        self.fitted = Some(smoothed.fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let not_fitted =
            || PlannerError::ModelFit("Holt-Winters must be fitted before predicting".to_string());
        let level = self.level.ok_or_else(not_fitted)?;
        let trend = self.trend.ok_or_else(not_fitted)?;
        let seasonals = self.seasonals.as_ref().ok_or_else(not_fitted)?;
        let period = self.seasonal_period;

        Ok((1..=horizon)
            .map(|h| {
                let season_idx = (self.n + h - 1) % period;
                level + h as f64 * trend + seasonals[season_idx]
            })
            .collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "HoltWinters(additive)"
    }
}
