//! Inventory control metrics: safety stock, reorder point and EOQ.
//!
//! For demand with mean `μ` and sample standard deviation `σ` per period,
//! lead time `L` periods and service level `p`:
//!
//! - `z = Φ⁻¹(p / 100)`
//! - `safety_stock = z × σ × √L`
//! - `reorder_point = lead-time demand + safety_stock`
//! - `eoq = √(2 × annual_demand × ordering_cost / holding_cost)`
//!
//! Lead-time demand is `μ × L` for [`InventoryCalculator::calculate`]; the
//! split variant sums the first `L` forecast values instead.

mod annualization;

pub use annualization::Annualization;

use crate::core::Granularity;
use crate::error::{PlannerError, Result};
use crate::utils::stats::{mean, normal_quantile, std_dev};
use serde::{Deserialize, Serialize};

/// Operational inputs to the inventory calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryParams {
    /// Replenishment lead time in periods of the demand series.
    pub lead_time_periods: usize,
    /// Target cycle service level, strictly between 0 and 100.
    pub service_level_percent: f64,
    /// Fixed cost per order.
    pub ordering_cost: Option<f64>,
    /// Annual holding cost per unit.
    pub holding_cost: Option<f64>,
}

impl Default for InventoryParams {
    fn default() -> Self {
        Self {
            lead_time_periods: 7,
            service_level_percent: 95.0,
            ordering_cost: None,
            holding_cost: None,
        }
    }
}

impl InventoryParams {
    /// Check lead time, service level and cost pairing.
    pub fn validate(&self) -> Result<()> {
        if self.lead_time_periods == 0 {
            return Err(PlannerError::InvalidParameter(
                "lead_time_periods must be at least 1".to_string(),
            ));
        }
        let sl = self.service_level_percent;
        if !(sl.is_finite() && sl > 0.0 && sl < 100.0) {
            return Err(PlannerError::InvalidParameter(format!(
                "service_level_percent must be strictly between 0 and 100, got {}",
                sl
            )));
        }
        for (name, cost) in [
            ("ordering_cost", self.ordering_cost),
            ("holding_cost", self.holding_cost),
        ] {
            if let Some(c) = cost {
                if !c.is_finite() || c < 0.0 {
                    return Err(PlannerError::InvalidParameter(format!(
                        "{} must be a non-negative number, got {}",
                        name, c
                    )));
                }
            }
        }
        match (self.ordering_cost, self.holding_cost) {
            (Some(_), None) | (None, Some(_)) => Err(PlannerError::InvalidParameter(
                "ordering_cost and holding_cost must be supplied together".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Inventory control parameters derived from demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InventoryMetrics {
    pub average_demand: f64,
    pub expected_demand_during_lead_time: f64,
    pub std_dev_demand: f64,
    pub z_score: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    /// Present only when both costs are supplied and positive.
    pub eoq: Option<f64>,
}

/// Inventory calculator bound to the granularity of the demand series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InventoryCalculator {
    granularity: Granularity,
    annualization: Annualization,
}

impl InventoryCalculator {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            annualization: Annualization::default(),
        }
    }

    /// Use a custom periods-per-year table.
    pub fn with_annualization(mut self, annualization: Annualization) -> Self {
        self.annualization = annualization;
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn periods_per_year(&self) -> f64 {
        self.annualization.periods_per_year(self.granularity)
    }

    /// Metrics with lead-time demand `average × lead_time_periods`.
    ///
    /// # Errors
    /// [`PlannerError::InvalidParameter`] for empty or non-finite demand and
    /// for anything [`InventoryParams::validate`] rejects.
    ///
    /// # Example
    /// ```
    /// use demand_planner::core::Granularity;
    /// use demand_planner::inventory::{InventoryCalculator, InventoryParams};
    ///
    /// let calc = InventoryCalculator::new(Granularity::Daily);
    /// let params = InventoryParams { lead_time_periods: 3, ..Default::default() };
    /// let m = calc.calculate(&[10.0; 30], &params).unwrap();
    /// assert_eq!(m.safety_stock, 0.0);
    /// assert_eq!(m.reorder_point, 30.0);
    /// ```
    pub fn calculate(&self, demand: &[f64], params: &InventoryParams) -> Result<InventoryMetrics> {
        params.validate()?;
        self.annualization.validate()?;
        check_demand("demand", demand)?;

        let average = mean(demand);
        let lead_demand = average * params.lead_time_periods as f64;
        Ok(self.finish(average, sample_std_dev(demand), lead_demand, params))
    }

    /// Metrics with mean and deviation from `history` and lead-time demand
    /// summed over the first `lead_time_periods` values of `forecast`.
    pub fn calculate_split(
        &self,
        history: &[f64],
        forecast: &[f64],
        params: &InventoryParams,
    ) -> Result<InventoryMetrics> {
        params.validate()?;
        self.annualization.validate()?;
        check_demand("history", history)?;
        check_demand("forecast", forecast)?;
        if forecast.len() < params.lead_time_periods {
            return Err(PlannerError::InvalidParameter(format!(
                "lead time of {} periods exceeds the {}-period forecast",
                params.lead_time_periods,
                forecast.len()
            )));
        }

        let lead_demand = forecast[..params.lead_time_periods].iter().sum();
        Ok(self.finish(mean(history), sample_std_dev(history), lead_demand, params))
    }

    fn finish(
        &self,
        average: f64,
        sigma: f64,
        lead_demand: f64,
        params: &InventoryParams,
    ) -> InventoryMetrics {
        let z_score = normal_quantile(params.service_level_percent / 100.0);
        let safety_stock = z_score * sigma * (params.lead_time_periods as f64).sqrt();

        let eoq = match (params.ordering_cost, params.holding_cost) {
            (Some(ordering), Some(holding)) if ordering > 0.0 && holding > 0.0 => {
                let annual_demand = average * self.periods_per_year();
                Some((2.0 * annual_demand * ordering / holding).sqrt())
            }
            _ => None,
        };

        let metrics = InventoryMetrics {
            average_demand: average,
            expected_demand_during_lead_time: lead_demand,
            std_dev_demand: sigma,
            z_score,
            safety_stock,
            reorder_point: lead_demand + safety_stock,
            eoq,
        };
        tracing::debug!(
            granularity = %self.granularity,
            safety_stock = metrics.safety_stock,
            reorder_point = metrics.reorder_point,
            eoq = ?metrics.eoq,
            "inventory metrics computed"
        );
        metrics
    }
}

/// Inventory metrics for daily demand.
pub fn calculate(
    demand: &[f64],
    lead_time_periods: usize,
    service_level_percent: f64,
    ordering_cost: Option<f64>,
    holding_cost: Option<f64>,
) -> Result<InventoryMetrics> {
    let params = InventoryParams {
        lead_time_periods,
        service_level_percent,
        ordering_cost,
        holding_cost,
    };
    InventoryCalculator::new(Granularity::Daily).calculate(demand, &params)
}

fn check_demand(what: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(PlannerError::InvalidParameter(format!(
            "{} must contain at least one value",
            what
        )));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(PlannerError::InvalidParameter(format!(
            "{} contains a non-finite value: {}",
            what, v
        )));
    }
    Ok(())
}

/// Sample standard deviation, zero for a single observation.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        std_dev(values)
    }
}
