//! ARIMA (Autoregressive Integrated Moving Average) model.

use crate::core::TimeSeries;
use crate::error::{PlannerError, Result};
use crate::models::arima::diff::{difference, integrate};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ARIMA order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Fewest observations an ARIMA of this order will fit.
    pub fn min_observations(&self) -> usize {
        self.p
            .saturating_add(self.d)
            .saturating_add(self.q)
            .saturating_add(1)
            .max(10)
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// ARIMA forecasting model.
///
/// ARIMA(p, d, q) combines:
/// - AR(p): Autoregressive component
/// - I(d): Differencing for stationarity
/// - MA(q): Moving average component
///
/// Coefficients are estimated by conditional sum of squares. The optimiser
/// is restarted from its best point up to [`ARIMA::RESTARTS`] times; a fit
/// that still has not converged is reported as a fit failure.
#[derive(Debug, Clone)]
pub struct ARIMA {
    order: ArimaOrder,
    name: String,
    optimizer: NelderMeadConfig,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Mean of the differenced series.
    intercept: f64,
    original: Option<Vec<f64>>,
    differenced: Option<Vec<f64>>,
    /// One-step residuals on the differenced scale.
    residuals_diff: Option<Vec<f64>>,
    /// Fitted values on the original scale.
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl ARIMA {
    /// Extra Nelder-Mead runs allowed after the first one stops unconverged.
    pub const RESTARTS: usize = 3;

    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::from_order(ArimaOrder::new(p, d, q))
    }

    pub fn from_order(order: ArimaOrder) -> Self {
        Self {
            order,
            name: order.to_string(),
            optimizer: NelderMeadConfig {
                max_iter: 2000,
                tolerance: 1e-6,
                ..Default::default()
            },
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            intercept: 0.0,
            original: None,
            differenced: None,
            residuals_diff: None,
            fitted: None,
            residuals: None,
        }
    }

    /// Replace the optimiser settings used for coefficient estimation.
    pub fn with_optimizer(mut self, config: NelderMeadConfig) -> Self {
        self.optimizer = config;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// One-step residuals of the ARMA recursion on `diff_series`.
    ///
    /// Residuals before `max(p, q)` are zero.
    fn one_step_residuals(
        diff_series: &[f64],
        p: usize,
        q: usize,
        ar: &[f64],
        ma: &[f64],
        intercept: f64,
    ) -> Vec<f64> {
        let n = diff_series.len();
        let start = p.max(q);
        let mut residuals = vec![0.0; n];

        for t in start..n {
            let mut pred = intercept;
            for i in 0..p {
                pred += ar[i] * (diff_series[t - 1 - i] - intercept);
            }
            for i in 0..q {
                pred += ma[i] * residuals[t - 1 - i];
            }
            residuals[t] = diff_series[t] - pred;
        }

        residuals
    }

    fn calculate_css(
        diff_series: &[f64],
        p: usize,
        q: usize,
        ar: &[f64],
        ma: &[f64],
        intercept: f64,
    ) -> f64 {
        Self::one_step_residuals(diff_series, p, q, ar, ma, intercept)
            .iter()
            .map(|e| e * e)
            .sum()
    }

    /// Estimate intercept, AR and MA coefficients by conditional least squares.
    fn estimate_parameters(&mut self, diff_series: &[f64]) -> Result<()> {
        let p = self.order.p;
        let q = self.order.q;

        let mean = diff_series.iter().sum::<f64>() / diff_series.len() as f64;

        if p == 0 && q == 0 {
            self.intercept = mean;
            self.ar_coefficients = vec![];
            self.ma_coefficients = vec![];
            return Ok(());
        }

        let mut initial = vec![0.0; p + q + 1];
        initial[0] = mean;
        for i in 0..p {
            initial[1 + i] = 0.1 / (i + 1) as f64;
        }
        for i in 0..q {
            initial[1 + p + i] = 0.1 / (i + 1) as f64;
        }

        // Keep AR stationary and MA invertible
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

        let css = |params: &[f64]| {
            Self::calculate_css(
                diff_series,
                p,
                q,
                &params[1..1 + p],
                &params[1 + p..],
                params[0],
            )
        };

        let mut result = nelder_mead(&css, &initial, Some(&bounds), self.optimizer.clone());
        let mut iterations = result.iterations;
        let mut restarts = 0;
        while !result.converged && restarts < Self::RESTARTS {
            restarts += 1;
            result = nelder_mead(
                &css,
                &result.optimal_point,
                Some(&bounds),
                self.optimizer.clone(),
            );
            iterations += result.iterations;
        }

        if !result.converged {
            return Err(PlannerError::ModelFit(format!(
                "{} did not converge after {} iterations",
                self.name, iterations
            )));
        }
        if !result.optimal_value.is_finite() || result.optimal_point.iter().any(|x| !x.is_finite())
        {
            return Err(PlannerError::ModelFit(format!(
                "{} produced non-finite coefficients",
                self.name
            )));
        }

        tracing::debug!(
            model = %self.name,
            iterations,
            restarts,
            css = result.optimal_value,
            "ARIMA coefficients estimated"
        );

        self.intercept = result.optimal_point[0];
        self.ar_coefficients = result.optimal_point[1..1 + p].to_vec();
        self.ma_coefficients = result.optimal_point[1 + p..].to_vec();
        Ok(())
    }
}

impl Default for ARIMA {
    fn default() -> Self {
        Self::from_order(ArimaOrder::default())
    }
}

impl Forecaster for ARIMA {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let needed = self.order.min_observations();
        if values.len() < needed {
            return Err(PlannerError::insufficient(&self.name, needed, values.len()));
        }

        let d = self.order.d;
        let diff_series = difference(values, d);
        self.estimate_parameters(&diff_series)?;

        let residuals_diff = Self::one_step_residuals(
            &diff_series,
            self.order.p,
            self.order.q,
            &self.ar_coefficients,
            &self.ma_coefficients,
            self.intercept,
        );

        // y_t - e_t; the first d periods have no differenced residual
        let fitted: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(t, y)| if t < d { *y } else { y - residuals_diff[t - d] })
            .collect();
        if fitted.iter().any(|f| !f.is_finite()) {
            return Err(PlannerError::ModelFit(format!(
                "{} produced non-finite fitted values",
                self.name
            )));
        }
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        self.original = Some(values.to_vec());
        self.differenced = Some(diff_series);
        self.residuals_diff = Some(residuals_diff);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let not_fitted =
            || PlannerError::ModelFit(format!("{} must be fitted before predicting", self.name));
        let original = self.original.as_ref().ok_or_else(not_fitted)?;
        let diff_series = self.differenced.as_ref().ok_or_else(not_fitted)?;
        let residuals = self.residuals_diff.as_ref().ok_or_else(not_fitted)?;

        let p = self.order.p;
        let q = self.order.q;

        let mut extended_diff = diff_series.clone();
        let mut extended_residuals = residuals.clone();

        for _ in 0..horizon {
            let t = extended_diff.len();
            let mut pred = self.intercept;

            for i in 0..p.min(t) {
                pred += self.ar_coefficients[i] * (extended_diff[t - 1 - i] - self.intercept);
            }
            for i in 0..q.min(t) {
                pred += self.ma_coefficients[i] * extended_residuals[t - 1 - i];
            }

            extended_diff.push(pred);
            // Future shocks are zero
            extended_residuals.push(0.0);
        }

        let forecast_diff = &extended_diff[diff_series.len()..];
        let predictions = integrate(forecast_diff, original, self.order.d);

        if predictions.iter().any(|v| !v.is_finite()) {
            return Err(PlannerError::ModelFit(format!(
                "{} produced non-finite forecasts",
                self.name
            )));
        }
        Ok(predictions)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
