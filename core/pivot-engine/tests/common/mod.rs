//! FILENAME: tests/common/mod.rs
//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use pivot_engine::{Axis, Dimension, PivotEngine};
use record_store::{MapRecord, Store};

/// The three-record person/year/value example.
pub struct PersonYearFixture;

impl PersonYearFixture {
    pub fn store() -> Store {
        vec![
            MapRecord::new().with("person", "A").with("year", 2020).with("value", 10),
            MapRecord::new().with("person", "A").with("year", 2021).with("value", 5),
            MapRecord::new().with("person", "B").with("year", 2020).with("value", 7),
        ]
        .into_iter()
        .collect()
    }

    pub fn engine() -> PivotEngine {
        let mut engine = PivotEngine::new(
            Axis::vertical(vec![Dimension::new("person").with_width(120)]),
            Axis::horizontal(vec![Dimension::new("year")]),
        );
        engine.set_measure("value");
        engine
    }
}

/// Region / product / quarter sales data.
pub struct SalesFixture;

impl SalesFixture {
    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Apples", "Q1", 100.0, 10.0),
            ("North", "Apples", "Q2", 120.0, 12.0),
            ("North", "Oranges", "Q1", 80.0, 8.0),
            ("South", "Apples", "Q1", 200.0, 20.0),
            ("South", "Oranges", "Q2", 90.0, 9.0),
            ("South", "Oranges", "Q2", 60.0, 6.0),
            ("East", "Pears", "Q3", 40.0, 4.0),
            ("West", "Apples", "Q4", 75.5, 7.0),
        ]
    }

    pub fn store() -> Store {
        SalesFixture::data()
            .into_iter()
            .map(|(region, product, quarter, sales, quantity)| {
                MapRecord::new()
                    .with("region", region)
                    .with("product", product)
                    .with("quarter", quarter)
                    .with("sales", sales)
                    .with("quantity", quantity)
            })
            .collect()
    }
}
