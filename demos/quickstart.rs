//! Quickstart: from an uploaded CSV to reorder point and EOQ.
//!
//! Run with: cargo run --example quickstart
//! Set RUST_LOG=demand_planner=debug to see the pipeline events.

use demand_planner::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn sample_csv() -> String {
    let mut csv = String::from("date,material,demand\n");
    let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    for day in 0..90u64 {
        let date = start + chrono::Days::new(day);
        // weekday peaks, a slow upward drift, one missing day
        if day == 40 {
            continue;
        }
        let weekly = [0.8, 1.1, 1.2, 1.15, 1.05, 0.9, 0.8][(day % 7) as usize];
        let demand = (90.0 + 0.15 * day as f64) * weekly;
        csv.push_str(&format!("{},cement,{:.1}\n", date, demand));
    }
    csv.push_str("unknown,cement,12.0\n");
    csv
}

fn main() -> demand_planner::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demand_planner=info".into()),
        )
        .init();

    println!("=== demand-planner Quickstart ===\n");

    // 1. Load the upload
    let table = RawTable::from_csv_reader(sample_csv().as_bytes())?;
    println!("Loaded {} rows, columns {:?}", table.len(), table.columns());

    let mut session = PlanningSession::new();
    session.load(table);

    // 2. Prepare the series
    let config = PlannerConfig::new("date", "demand")
        .with_horizon(28)
        .with_inventory(InventoryParams {
            lead_time_periods: 7,
            service_level_percent: 95.0,
            ordering_cost: Some(150.0),
            holding_cost: Some(0.4),
        });

    let prepared = session.prepare(&config)?;
    let report = &prepared.report;
    println!(
        "Prepared {} {} periods ({} unparseable dates, {} missing values, {} gaps filled)",
        prepared.series.len(),
        prepared.series.granularity(),
        report.unparseable_dates,
        report.missing_values,
        report.filled_periods
    );

    // 3. Compare the engines
    let seasonal = ForecastModel::ExponentialSmoothing(EtsParams {
        seasonal: true,
        seasonal_periods: 7,
        trend: true,
    });
    for model in [ForecastModel::default(), seasonal, ForecastModel::Arima(ArimaOrder::default())] {
        let run = config.clone().with_model(model);
        let forecast = session.run_forecast(&run)?;
        let next_week: f64 = forecast.forecast_values()[..7].iter().sum();
        println!("{:<24} next 7 periods: {:>9.1}", forecast.model(), next_week);
    }

    // 4. Inventory on the last forecast
    let metrics = session.inventory(&config)?;
    println!("\n--- Inventory ({:?} basis) ---", config.demand_basis);
    println!("Average demand:      {:>10.2}", metrics.average_demand);
    println!("Std dev of demand:   {:>10.2}", metrics.std_dev_demand);
    println!("Lead-time demand:    {:>10.2}", metrics.expected_demand_during_lead_time);
    println!("Z-score:             {:>10.4}", metrics.z_score);
    println!("Safety stock:        {:>10.2}", metrics.safety_stock);
    println!("Reorder point:       {:>10.2}", metrics.reorder_point);
    match metrics.eoq {
        Some(eoq) => println!("EOQ:                 {:>10.2}", eoq),
        None => println!("EOQ:                 {:>10}", "n/a"),
    }

    Ok(())
}
