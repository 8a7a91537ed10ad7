//! Planner configuration.

use crate::error::{PlannerError, Result};
use crate::inventory::{Annualization, InventoryParams};
use crate::models::{ArimaOrder, EtsParams, ForecastModel};
use crate::prepare::Aggregation;
use serde::{Deserialize, Serialize};

/// Which forecasting model to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    ExponentialSmoothing,
    Arima,
}

/// Which demand feeds the inventory calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandBasis {
    /// Historical demand only.
    Historical,
    /// Forecast values only.
    Forecast,
    /// Mean and deviation from history, lead-time demand from the forecast.
    #[default]
    Split,
}

/// Everything a planning run needs besides the data itself.
///
/// Missing fields take their defaults when deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Column holding the period dates.
    pub date_column: String,
    /// Column holding the demand values.
    pub value_column: String,
    /// How rows sharing a period are combined.
    pub aggregation: Aggregation,
    pub model: ModelKind,
    /// Exponential smoothing: add a seasonal component.
    pub seasonal: bool,
    /// Exponential smoothing: season length in periods.
    pub seasonal_periods: usize,
    /// Exponential smoothing: add a trend component.
    pub trend: bool,
    pub arima_order: ArimaOrder,
    /// Periods to forecast.
    pub horizon: usize,
    pub lead_time_periods: usize,
    pub service_level_percent: f64,
    pub ordering_cost: Option<f64>,
    pub holding_cost: Option<f64>,
    pub demand_basis: DemandBasis,
    pub annualization: Annualization,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let ets = EtsParams::default();
        let inventory = InventoryParams::default();
        Self {
            date_column: "date".to_string(),
            value_column: "demand".to_string(),
            aggregation: Aggregation::default(),
            model: ModelKind::default(),
            seasonal: ets.seasonal,
            seasonal_periods: ets.seasonal_periods,
            trend: ets.trend,
            arima_order: ArimaOrder::default(),
            horizon: 30,
            lead_time_periods: inventory.lead_time_periods,
            service_level_percent: inventory.service_level_percent,
            ordering_cost: None,
            holding_cost: None,
            demand_basis: DemandBasis::default(),
            annualization: Annualization::default(),
        }
    }
}

impl PlannerConfig {
    /// Default configuration reading the given columns.
    pub fn new(date_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            value_column: value_column.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: ForecastModel) -> Self {
        match model {
            ForecastModel::ExponentialSmoothing(p) => {
                self.model = ModelKind::ExponentialSmoothing;
                self.seasonal = p.seasonal;
                self.seasonal_periods = p.seasonal_periods;
                self.trend = p.trend;
            }
            ForecastModel::Arima(order) => {
                self.model = ModelKind::Arima;
                self.arima_order = order;
            }
        }
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_inventory(mut self, params: InventoryParams) -> Self {
        self.lead_time_periods = params.lead_time_periods;
        self.service_level_percent = params.service_level_percent;
        self.ordering_cost = params.ordering_cost;
        self.holding_cost = params.holding_cost;
        self
    }

    pub fn with_demand_basis(mut self, basis: DemandBasis) -> Self {
        self.demand_basis = basis;
        self
    }

    /// Check horizon, lead time, service level and cost pairing up front.
    pub fn validate(&self) -> Result<()> {
        if self.date_column.trim().is_empty() || self.value_column.trim().is_empty() {
            return Err(PlannerError::InvalidParameter(
                "date_column and value_column must be named".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(PlannerError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        if self.model == ModelKind::ExponentialSmoothing
            && self.seasonal
            && self.seasonal_periods == 0
        {
            return Err(PlannerError::InvalidParameter(
                "seasonal_periods must be at least 1".to_string(),
            ));
        }
        self.inventory_params().validate()?;
        self.annualization.validate()?;
        if self.demand_basis == DemandBasis::Split && self.lead_time_periods > self.horizon {
            return Err(PlannerError::InvalidParameter(format!(
                "lead_time_periods ({}) cannot exceed horizon ({})",
                self.lead_time_periods, self.horizon
            )));
        }
        Ok(())
    }

    /// The configured forecasting strategy.
    pub fn forecast_model(&self) -> ForecastModel {
        match self.model {
            ModelKind::ExponentialSmoothing => ForecastModel::ExponentialSmoothing(EtsParams {
                seasonal: self.seasonal,
                seasonal_periods: self.seasonal_periods,
                trend: self.trend,
            }),
            ModelKind::Arima => ForecastModel::Arima(self.arima_order),
        }
    }

    pub fn inventory_params(&self) -> InventoryParams {
        InventoryParams {
            lead_time_periods: self.lead_time_periods,
            service_level_percent: self.service_level_percent,
            ordering_cost: self.ordering_cost,
            holding_cost: self.holding_cost,
        }
    }
}
