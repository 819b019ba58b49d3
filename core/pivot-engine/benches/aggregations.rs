//! Benchmarks for the aggregation operations over a synthetic sales table.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{DataTable, SalesRecord, CATEGORY, ORDER_DATE, PRODUCT_NAME, PROFIT, REGION, SALES};
use pivot_engine::{pivot, sum_by_period, sum_by_two_keys, top_n_by_sum, AggregationType, Granularity};

const REGIONS: [&str; 4] = ["Central", "East", "South", "West"];
const CATEGORIES: [&str; 3] = ["Furniture", "Office Supplies", "Technology"];

fn synthetic_table(rows: usize) -> DataTable {
    let start = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap_or_default();
    let records: Vec<SalesRecord> = (0..rows)
        .map(|i| {
            SalesRecord::new(
                &format!("Product {}", i % 1_800),
                start + Duration::days((i % 1_460) as i64),
                REGIONS[i % REGIONS.len()],
                CATEGORIES[(i / 7) % CATEGORIES.len()],
                ((i * 37) % 5_000) as f64 / 3.0,
                ((i * 13) % 900) as f64 / 4.0 - 50.0,
            )
        })
        .collect();
    DataTable::from_sales_records(&records)
}

fn bench_aggregations(c: &mut Criterion) {
    let table = synthetic_table(10_000);

    c.bench_function("top_n_by_sum 10k rows", |b| {
        b.iter(|| top_n_by_sum(black_box(&table), PRODUCT_NAME, SALES, 10))
    });
    c.bench_function("sum_by_period month 10k rows", |b| {
        b.iter(|| sum_by_period(black_box(&table), ORDER_DATE, SALES, Granularity::Month))
    });
    c.bench_function("sum_by_two_keys 10k rows", |b| {
        b.iter(|| sum_by_two_keys(black_box(&table), REGION, CATEGORY, PROFIT))
    });
    c.bench_function("pivot sum 10k rows", |b| {
        b.iter(|| pivot(black_box(&table), REGION, CATEGORY, SALES, AggregationType::Sum))
    });
}

criterion_group!(benches, bench_aggregations);
criterion_main!(benches);
