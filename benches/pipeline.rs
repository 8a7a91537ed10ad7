//! Benchmarks for series preparation, model fitting and inventory sizing.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use demand_planner::core::{CellValue, Granularity, RawTable, TimeSeries};
use demand_planner::inventory::calculate;
use demand_planner::models::{ArimaOrder, EtsParams, ForecastModel};
use demand_planner::prepare::{prepare, Aggregation};

fn demand(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 0.2 * i as f64 + 15.0 * (i as f64 * 2.0 * std::f64::consts::PI / 7.0).sin())
        .collect()
}

fn series(n: usize) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    TimeSeries::from_start(start, Granularity::Daily, demand(n)).unwrap()
}

fn bench_prepare(c: &mut Criterion) {
    let sizes = [365, 3650];
    let mut group = c.benchmark_group("prepare");

    for size in sizes {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut table = RawTable::new(["date", "demand"]);
        for (i, v) in demand(size).into_iter().enumerate() {
            let d = start + chrono::Days::new(i as u64);
            table
                .push_row([CellValue::from(d.to_string().as_str()), CellValue::from(v)])
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("daily_sum", size), &table, |b, t| {
            b.iter(|| black_box(prepare(t, "date", "demand", Aggregation::Sum).unwrap()))
        });
    }
    group.finish();
}

fn bench_models(c: &mut Criterion) {
    let sizes = [60, 365];
    let models = [
        ("ses", ForecastModel::ExponentialSmoothing(EtsParams { trend: false, ..Default::default() })),
        ("holt", ForecastModel::default()),
        ("holt_winters", ForecastModel::ExponentialSmoothing(EtsParams { seasonal: true, ..Default::default() })),
        ("arima_111", ForecastModel::Arima(ArimaOrder::default())),
    ];
    let mut group = c.benchmark_group("fit_and_forecast");

    for size in sizes {
        let ts = series(size);
        for (name, model) in &models {
            group.bench_with_input(BenchmarkId::new(*name, size), &ts, |b, ts| {
                b.iter(|| black_box(model.fit_and_forecast(ts, 30).unwrap()))
            });
        }
    }
    group.finish();
}

fn bench_inventory(c: &mut Criterion) {
    let data = demand(365);
    c.bench_function("inventory_calculate", |b| {
        b.iter(|| black_box(calculate(&data, 7, 95.0, Some(100.0), Some(5.0)).unwrap()))
    });
}

criterion_group!(benches, bench_prepare, bench_models, bench_inventory);
criterion_main!(benches);
