//! Caller-owned planning state: the loaded table, its prepared series and the
//! latest forecast.

use crate::config::{DemandBasis, PlannerConfig};
use crate::core::{ForecastResult, RawTable, TimeSeries};
use crate::error::{PlannerError, Result};
use crate::inventory::{InventoryCalculator, InventoryMetrics};
use crate::prepare::{prepare, PreparedSeries};

/// One planning workflow: load a table, prepare it, forecast, size inventory.
///
/// Loading a new table discards everything derived from the previous one.
/// Preparing again discards the previous series and its forecast, whether or
/// not the new preparation succeeds, and each forecast replaces the last.
///
/// # Example
/// ```
/// use demand_planner::config::PlannerConfig;
/// use demand_planner::core::RawTable;
/// use demand_planner::session::PlanningSession;
///
/// let mut table = RawTable::new(["date", "demand"]);
/// for day in 1..=28 {
///     let date = format!("2025-02-{:02}", day);
///     table.push_row([date.as_str(), "100"]).unwrap();
/// }
///
/// let config = PlannerConfig::default().with_horizon(7);
/// let mut session = PlanningSession::new();
/// session.load(table);
/// let forecast = session.run_forecast(&config).unwrap();
/// assert_eq!(forecast.horizon(), 7);
///
/// let metrics = session.inventory(&config).unwrap();
/// assert!(metrics.reorder_point > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanningSession {
    table: Option<RawTable>,
    prepared: Option<PreparedSeries>,
    forecast: Option<ForecastResult>,
}

impl PlanningSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current table, dropping any derived series and forecast.
    pub fn load(&mut self, table: RawTable) {
        tracing::debug!(rows = table.len(), columns = table.columns().len(), "table loaded");
        self.table = Some(table);
        self.prepared = None;
        self.forecast = None;
    }

    /// Prepare the loaded table with the configured columns and aggregation.
    ///
    /// Any forecast fitted on the previous series is dropped.
    pub fn prepare(&mut self, config: &PlannerConfig) -> Result<&PreparedSeries> {
        self.prepared = None;
        self.forecast = None;
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| PlannerError::Validation("no data loaded".to_string()))?;
        let prepared = prepare(
            table,
            &config.date_column,
            &config.value_column,
            config.aggregation,
        )?;
        Ok(self.prepared.insert(prepared))
    }

    /// Re-prepare the table and fit the configured model.
    ///
    /// The previous forecast is discarded even if this run fails.
    pub fn run_forecast(&mut self, config: &PlannerConfig) -> Result<&ForecastResult> {
        config.validate()?;
        self.forecast = None;

        let model = config.forecast_model();
        let prepared = self.prepare(config)?;
        let result = model.fit_and_forecast(&prepared.series, config.horizon)?;
        Ok(self.forecast.insert(result))
    }

    /// Inventory metrics for the prepared series, using the demand basis from
    /// `config`.
    ///
    /// # Errors
    /// [`PlannerError::Validation`] when nothing has been prepared, or when the
    /// basis needs a forecast and none has been run.
    pub fn inventory(&self, config: &PlannerConfig) -> Result<InventoryMetrics> {
        let series = self.series().ok_or_else(|| {
            PlannerError::Validation("no prepared series; load and prepare data first".to_string())
        })?;
        let calculator = InventoryCalculator::new(series.granularity())
            .with_annualization(config.annualization);
        let params = config.inventory_params();

        let forecast_values = || {
            self.forecast
                .as_ref()
                .map(ForecastResult::forecast_values)
                .ok_or_else(|| {
                    PlannerError::Validation(format!(
                        "demand basis {:?} needs a forecast; run the forecast first",
                        config.demand_basis
                    ))
                })
        };

        match config.demand_basis {
            DemandBasis::Historical => calculator.calculate(series.values(), &params),
            DemandBasis::Forecast => calculator.calculate(&forecast_values()?, &params),
            DemandBasis::Split => {
                calculator.calculate_split(series.values(), &forecast_values()?, &params)
            }
        }
    }

    /// Forget the table, series and forecast.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn table(&self) -> Option<&RawTable> {
        self.table.as_ref()
    }

    pub fn prepared(&self) -> Option<&PreparedSeries> {
        self.prepared.as_ref()
    }

    pub fn series(&self) -> Option<&TimeSeries> {
        self.prepared.as_ref().map(|p| &p.series)
    }

    pub fn forecast(&self) -> Option<&ForecastResult> {
        self.forecast.as_ref()
    }
}
