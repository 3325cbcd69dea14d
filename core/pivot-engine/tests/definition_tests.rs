//! FILENAME: tests/definition_tests.rs
//! Integration tests for JSON definitions and stores.

use pivot_engine::{
    calculate_pivot, render_value, AggregationType, CustomAggregator, Orientation,
    PivotDefinition, PivotEngine, PivotError, SortDirection, DEFAULT_EMPTY_CELL_TEXT,
};
use record_store::{Store, Value};

const RECORDS: &str = r#"[
    {"person": "A", "year": 2020, "value": 10},
    {"person": "A", "year": 2021, "value": 5},
    {"person": "B", "year": 2020, "value": 7},
    {"person": null, "year": 2021, "value": 99}
]"#;

const DEFINITION: &str = r#"{
    "left_axis": {
        "orientation": "vertical",
        "dimensions": [{"field": "person", "direction": "DESC", "width": 80}]
    },
    "top_axis": {
        "orientation": "horizontal",
        "dimensions": [{"field": "year"}]
    },
    "measure": "value",
    "aggregator": "avg",
    "empty_cell_text": "-"
}"#;

#[test]
fn test_definition_parses() {
    let definition = PivotDefinition::from_json(DEFINITION).unwrap();
    assert_eq!(definition.left_axis.orientation, Orientation::Vertical);
    assert_eq!(definition.top_axis.orientation, Orientation::Horizontal);
    let person = &definition.left_axis.dimensions()[0];
    assert_eq!(person.direction, SortDirection::Descending);
    assert_eq!(person.width, Some(80));
    assert_eq!(definition.measure.as_deref(), Some("value"));
    assert_eq!(definition.aggregator, "avg");
}

#[test]
fn test_definition_defaults() {
    let definition = PivotDefinition::from_json(r#"{"left_axis": {}, "top_axis": {}}"#).unwrap();
    assert!(definition.left_axis.dimensions().is_empty());
    assert_eq!(definition.aggregator, AggregationType::Sum.name());
    assert_eq!(definition.measure, None);
    assert_eq!(definition.empty_cell_text, None);
}

#[test]
fn test_definition_round_trips() {
    let definition = PivotDefinition::from_json(DEFINITION).unwrap();
    let json = definition.to_json().unwrap();
    assert_eq!(PivotDefinition::from_json(&json).unwrap(), definition);
}

#[test]
fn test_invalid_definition_is_a_json_error() {
    let err = PivotDefinition::from_json(r#"{"left_axis": 3}"#).unwrap_err();
    assert!(matches!(err, PivotError::Json(_)));
}

#[test]
fn test_calculate_from_json() {
    let store = Store::from_json(RECORDS).unwrap();
    let definition = PivotDefinition::from_json(DEFINITION).unwrap();
    let tab = calculate_pivot(&definition, &store).unwrap();

    assert_eq!(tab.row_labels(), vec!["B", "A"]);
    assert_eq!(tab.column_labels(), vec!["2020", "2021"]);
    assert_eq!(
        tab.cells,
        vec![
            vec![Value::Number(7.0), Value::Empty],
            vec![Value::Number(10.0), Value::Number(5.0)],
        ]
    );

    let empty_text = definition
        .empty_cell_text
        .as_deref()
        .unwrap_or(DEFAULT_EMPTY_CELL_TEXT);
    assert_eq!(tab.render(None, empty_text)[0][1], "-");
    assert_eq!(render_value(&Value::Empty, None, DEFAULT_EMPTY_CELL_TEXT), "n/a");
}

#[test]
fn test_definition_with_registered_aggregator() {
    let store = Store::from_json(RECORDS).unwrap();
    let mut definition = PivotDefinition::from_json(DEFINITION).unwrap();
    definition.aggregator = "double_sum".to_string();

    assert!(matches!(
        calculate_pivot(&definition, &store),
        Err(PivotError::UnknownAggregator(_))
    ));

    let mut engine = PivotEngine::from_definition(&definition);
    engine.register_type(
        "double_sum",
        CustomAggregator::new(|records, measure| {
            let sum = pivot_engine::aggregate(AggregationType::Sum, records, measure);
            Ok(Value::Number(sum.as_number() * 2.0))
        }),
    );
    assert!(engine.registry().contains("double_sum"));

    let tab = engine.extract_data(&store).unwrap();
    assert_eq!(tab.cells[1], vec![Value::Number(20.0), Value::Number(10.0)]);
}
