//! FILENAME: core/pivot-engine/benches/pivot_calculations.rs
//! Benchmarks for matrix extraction over synthetic sales data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pivot_engine::{AggregationType, Axis, Dimension, PivotEngine};
use record_store::{MapRecord, Store};

const REGIONS: [&str; 6] = ["North", "South", "East", "West", "Central", "Overseas"];
const PRODUCTS: [&str; 8] = [
    "Apples", "Oranges", "Pears", "Plums", "Grapes", "Kiwis", "Limes", "Mangos",
];

fn create_store(rows: usize) -> Store {
    (0..rows)
        .map(|i| {
            MapRecord::new()
                .with("region", REGIONS[i % REGIONS.len()])
                .with("product", PRODUCTS[(i / 3) % PRODUCTS.len()])
                .with("year", 2015 + (i % 10) as i64)
                .with("sales", ((i * 37) % 1000) as f64)
        })
        .collect()
}

fn create_engine(aggregation: AggregationType) -> PivotEngine {
    let mut engine = PivotEngine::new(
        Axis::vertical(vec![Dimension::new("region"), Dimension::new("product")]),
        Axis::horizontal(vec![Dimension::new("year")]),
    );
    engine.set_measure("sales");
    engine.set_aggregator(aggregation);
    engine
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_data");
    for rows in [1_000usize, 10_000] {
        let store = create_store(rows);
        for aggregation in [AggregationType::Sum, AggregationType::Avg] {
            let engine = create_engine(aggregation);
            group.bench_with_input(
                BenchmarkId::new(aggregation.name(), rows),
                &store,
                |b, store| b.iter(|| engine.extract_data(black_box(store))),
            );
        }
    }
    group.finish();
}

fn bench_tuples(c: &mut Criterion) {
    let store = create_store(10_000);
    let engine = create_engine(AggregationType::Sum);
    c.bench_function("left_tuples_10k", |b| {
        b.iter(|| engine.left_tuples(black_box(&store)))
    });
}

criterion_group!(benches, bench_extract, bench_tuples);
criterion_main!(benches);
