//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns records into a cross tab.
//!
//! The engine owns the configuration (two axes, measure, aggregator) and
//! borrows the records for the duration of one call.
//!
//! Algorithm:
//! 1. Derive the left and top tuples from the records
//! 2. Build an empty `left × top` matrix of record buckets
//! 3. Single pass over the records: append each record to every cell whose
//!    left and top matchers both accept it
//! 4. Reduce every bucket through the selected aggregator
//!
//! Tuples are derived again on every call; nothing is cached between calls.

use std::fmt;

use log::debug;
use record_store::{Record, RecordStore, Value};

use crate::aggregator::{Aggregator, AggregatorRegistry, CustomAggregator, ResolvedAggregator};
use crate::axis::{Axis, Tuple};
use crate::definition::PivotDefinition;
use crate::error::{PivotError, Result};
use crate::view::{CrossTab, Totals};

/// Record indices collected per cell, `buckets[row][col]`.
type Buckets = Vec<Vec<Vec<usize>>>;

/// What changed when the refresh hook fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconfigured {
    LeftAxis,
    TopAxis,
}

/// Called after an axis is replaced, typically to schedule a re-render.
pub type RefreshHook = Box<dyn FnMut(Reconfigured) + Send>;

// ============================================================================
// PIVOT ENGINE
// ============================================================================

pub struct PivotEngine {
    left_axis: Axis,
    top_axis: Axis,
    measure: Option<String>,
    aggregator: Aggregator,
    registry: AggregatorRegistry,
    refresh_hook: Option<RefreshHook>,

    /// Bumped on every reconfiguration.
    version: u64,
}

impl fmt::Debug for PivotEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PivotEngine")
            .field("left_axis", &self.left_axis)
            .field("top_axis", &self.top_axis)
            .field("measure", &self.measure)
            .field("aggregator", &self.aggregator)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl PivotEngine {
    pub fn new(left_axis: Axis, top_axis: Axis) -> Self {
        PivotEngine {
            left_axis,
            top_axis,
            measure: None,
            aggregator: Aggregator::default(),
            registry: AggregatorRegistry::new(),
            refresh_hook: None,
            version: 0,
        }
    }

    /// Builds an engine from a serializable definition.
    /// The aggregator name is resolved when data is extracted.
    pub fn from_definition(definition: &PivotDefinition) -> Self {
        let mut engine = PivotEngine::new(definition.left_axis.clone(), definition.top_axis.clone());
        engine.measure = definition.measure.clone();
        engine.aggregator = Aggregator::from(definition.aggregator.as_str());
        engine
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn left_axis(&self) -> &Axis {
        &self.left_axis
    }

    pub fn top_axis(&self) -> &Axis {
        &self.top_axis
    }

    pub fn measure(&self) -> Option<&str> {
        self.measure.as_deref()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_measure(&mut self, field: impl Into<String>) {
        self.measure = Some(field.into());
        self.bump_version();
    }

    /// Accepts a built-in, a registry name, or a custom function.
    /// Names are not checked until `extract_data`.
    pub fn set_aggregator(&mut self, aggregator: impl Into<Aggregator>) {
        self.aggregator = aggregator.into();
        self.bump_version();
    }

    pub fn set_left_axis(&mut self, axis: Axis) {
        self.left_axis = axis;
        self.bump_version();
        self.request_refresh(Reconfigured::LeftAxis);
    }

    pub fn set_top_axis(&mut self, axis: Axis) {
        self.top_axis = axis;
        self.bump_version();
        self.request_refresh(Reconfigured::TopAxis);
    }

    /// Makes `func` selectable by `name` through `set_aggregator`.
    pub fn register_type(&mut self, name: impl Into<String>, func: CustomAggregator) {
        self.registry.register_type(name, func);
        self.bump_version();
    }

    pub fn registry(&self) -> &AggregatorRegistry {
        &self.registry
    }

    pub fn set_refresh_hook(&mut self, hook: RefreshHook) {
        self.refresh_hook = Some(hook);
    }

    pub fn clear_refresh_hook(&mut self) {
        self.refresh_hook = None;
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }

    fn request_refresh(&mut self, change: Reconfigured) {
        if let Some(hook) = self.refresh_hook.as_mut() {
            hook(change);
        }
    }

    // ------------------------------------------------------------------------
    // Calculation
    // ------------------------------------------------------------------------

    pub fn left_tuples<S: RecordStore + ?Sized>(&self, store: &S) -> Vec<Tuple> {
        self.left_axis.tuples(store.records())
    }

    pub fn top_tuples<S: RecordStore + ?Sized>(&self, store: &S) -> Vec<Tuple> {
        self.top_axis.tuples(store.records())
    }

    /// Computes the aggregated matrix.
    ///
    /// Fails when no measure is set, when a named aggregator is unknown, or
    /// when a custom aggregator returns an error. An empty store yields an
    /// empty `CrossTab`.
    pub fn extract_data<S: RecordStore + ?Sized>(&self, store: &S) -> Result<CrossTab> {
        let (measure, aggregator) = self.resolve_config()?;
        let records = store.records();
        if records.is_empty() {
            debug!(target: "pivot", "extract_data: no records");
            return Ok(CrossTab::empty());
        }

        let left_tuples = self.left_axis.tuples(records);
        let top_tuples = self.top_axis.tuples(records);
        let buckets = distribute(records, &left_tuples, &top_tuples);

        let mut cells = Vec::with_capacity(buckets.len());
        for row in &buckets {
            let mut values = Vec::with_capacity(row.len());
            for bucket in row {
                values.push(reduce(records, bucket, &aggregator, measure)?);
            }
            cells.push(values);
        }

        debug!(
            target: "pivot",
            "extract_data: {} records -> {}x{} cells via {}",
            records.len(),
            left_tuples.len(),
            top_tuples.len(),
            aggregator.name()
        );

        Ok(CrossTab {
            left_tuples,
            top_tuples,
            cells,
        })
    }

    /// Aggregates each row, each column and the whole matched set.
    /// Totals re-run the aggregator over the records, so `avg`, `min` and
    /// `max` totals are exact rather than combinations of cell values.
    pub fn extract_totals<S: RecordStore + ?Sized>(&self, store: &S) -> Result<Totals> {
        let (measure, aggregator) = self.resolve_config()?;
        let records = store.records();
        if records.is_empty() {
            return Ok(Totals {
                rows: Vec::new(),
                columns: Vec::new(),
                grand: aggregator.apply(&[], measure)?,
            });
        }

        let left_tuples = self.left_axis.tuples(records);
        let top_tuples = self.top_axis.tuples(records);
        let buckets = distribute(records, &left_tuples, &top_tuples);

        let mut rows = Vec::with_capacity(left_tuples.len());
        for row in &buckets {
            let members = merge_buckets(row.iter());
            rows.push(reduce(records, &members, &aggregator, measure)?);
        }

        let mut columns = Vec::with_capacity(top_tuples.len());
        for col in 0..top_tuples.len() {
            let members = merge_buckets(buckets.iter().map(|row| &row[col]));
            columns.push(reduce(records, &members, &aggregator, measure)?);
        }

        let all = merge_buckets(buckets.iter().flatten());
        let grand = reduce(records, &all, &aggregator, measure)?;

        Ok(Totals {
            rows,
            columns,
            grand,
        })
    }

    /// Source record indices that make up one cell.
    /// Out-of-range coordinates yield an empty list.
    pub fn drill_down<S: RecordStore + ?Sized>(&self, store: &S, row: usize, col: usize) -> Vec<usize> {
        let records = store.records();
        let left_tuples = self.left_axis.tuples(records);
        let top_tuples = self.top_axis.tuples(records);

        let (Some(left), Some(top)) = (left_tuples.get(row), top_tuples.get(col)) else {
            return Vec::new();
        };

        records
            .iter()
            .enumerate()
            .filter(|(_, record)| left.matches(*record) && top.matches(*record))
            .map(|(index, _)| index)
            .collect()
    }

    /// Configuration errors surface here, at the point of use.
    fn resolve_config(&self) -> Result<(&str, ResolvedAggregator<'_>)> {
        let measure = self.measure.as_deref().ok_or(PivotError::MissingMeasure)?;
        let aggregator = self.registry.resolve(&self.aggregator)?;
        Ok((measure, aggregator))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Appends every record index to each cell whose tuples both accept it.
/// Exclusivity of tuples is not assumed.
fn distribute<R: Record>(records: &[R], left_tuples: &[Tuple], top_tuples: &[Tuple]) -> Buckets {
    let mut buckets: Buckets = vec![vec![Vec::new(); top_tuples.len()]; left_tuples.len()];

    for (index, record) in records.iter().enumerate() {
        for (row, left) in left_tuples.iter().enumerate() {
            if !left.matches(record) {
                continue;
            }
            for (col, top) in top_tuples.iter().enumerate() {
                if top.matches(record) {
                    buckets[row][col].push(index);
                }
            }
        }
    }

    buckets
}

/// Sorted, de-duplicated union of several buckets.
fn merge_buckets<'a>(buckets: impl Iterator<Item = &'a Vec<usize>>) -> Vec<usize> {
    let mut merged: Vec<usize> = buckets.flat_map(|bucket| bucket.iter().copied()).collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

fn reduce<R: Record>(
    records: &[R],
    members: &[usize],
    aggregator: &ResolvedAggregator<'_>,
    measure: &str,
) -> Result<Value> {
    let cell: Vec<&dyn Record> = members
        .iter()
        .map(|&index| &records[index] as &dyn Record)
        .collect();
    aggregator.apply(&cell, measure)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Calculates a cross tab straight from a definition.
/// This is the main entry point when no custom aggregators are involved.
pub fn calculate_pivot<S: RecordStore + ?Sized>(definition: &PivotDefinition, store: &S) -> Result<CrossTab> {
    PivotEngine::from_definition(definition).extract_data(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AggregationType, Dimension};
    use record_store::MapRecord;
    use std::sync::{Arc, Mutex};

    fn create_test_records() -> Vec<MapRecord> {
        vec![
            MapRecord::new().with("region", "North").with("product", "Apples").with("sales", 100),
            MapRecord::new().with("region", "North").with("product", "Oranges").with("sales", 150),
            MapRecord::new().with("region", "South").with("product", "Apples").with("sales", 200),
            MapRecord::new().with("region", "South").with("product", "Oranges").with("sales", 250),
        ]
    }

    fn create_test_engine() -> PivotEngine {
        let mut engine = PivotEngine::new(
            Axis::vertical(vec![Dimension::new("region")]),
            Axis::horizontal(vec![Dimension::new("product")]),
        );
        engine.set_measure("sales");
        engine
    }

    #[test]
    fn test_basic_pivot_calculation() {
        let records = create_test_records();
        let engine = create_test_engine();
        let tab = engine.extract_data(&records).unwrap();

        assert_eq!(tab.row_labels(), vec!["North", "South"]);
        assert_eq!(tab.column_labels(), vec!["Apples", "Oranges"]);
        assert_eq!(
            tab.cells,
            vec![
                vec![Value::Number(100.0), Value::Number(150.0)],
                vec![Value::Number(200.0), Value::Number(250.0)],
            ]
        );
    }

    #[test]
    fn test_no_row_dimensions() {
        let records = create_test_records();
        let mut engine = create_test_engine();
        engine.set_left_axis(Axis::vertical(Vec::new()));
        let tab = engine.extract_data(&records).unwrap();
        assert_eq!(tab.row_count(), 1);
        assert_eq!(tab.cells, vec![vec![Value::Number(300.0), Value::Number(400.0)]]);
    }

    #[test]
    fn test_no_dimensions_on_either_axis() {
        let records = create_test_records();
        let mut engine = create_test_engine();
        engine.set_left_axis(Axis::vertical(Vec::new()));
        engine.set_top_axis(Axis::horizontal(Vec::new()));
        let tab = engine.extract_data(&records).unwrap();
        assert_eq!(tab.cells, vec![vec![Value::Number(700.0)]]);
    }

    #[test]
    fn test_missing_measure_is_an_error() {
        let records = create_test_records();
        let engine = PivotEngine::new(Axis::default(), Axis::default());
        assert!(matches!(engine.extract_data(&records), Err(PivotError::MissingMeasure)));
    }

    #[test]
    fn test_unknown_aggregator_fails_at_extract() {
        let records = create_test_records();
        let mut engine = create_test_engine();
        engine.set_aggregator("median");
        assert!(matches!(
            engine.extract_data(&records),
            Err(PivotError::UnknownAggregator(name)) if name == "median"
        ));
    }

    #[test]
    fn test_empty_store_yields_empty_matrix() {
        let records: Vec<MapRecord> = Vec::new();
        let engine = create_test_engine();
        let tab = engine.extract_data(&records).unwrap();
        assert!(tab.cells.is_empty());
        assert!(tab.is_empty());
    }

    #[test]
    fn test_totals() {
        let records = create_test_records();
        let mut engine = create_test_engine();
        engine.set_aggregator(AggregationType::Avg);
        let totals = engine.extract_totals(&records).unwrap();
        assert_eq!(totals.rows, vec![Value::Number(125.0), Value::Number(225.0)]);
        assert_eq!(totals.columns, vec![Value::Number(150.0), Value::Number(200.0)]);
        assert_eq!(totals.grand, Value::Number(175.0));
    }

    #[test]
    fn test_drill_down() {
        let records = create_test_records();
        let engine = create_test_engine();
        assert_eq!(engine.drill_down(&records, 1, 0), vec![2]);
        assert!(engine.drill_down(&records, 5, 0).is_empty());
    }

    #[test]
    fn test_version_and_refresh_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut engine = create_test_engine();
        let before = engine.version();
        engine.set_refresh_hook(Box::new(move |change| {
            sink.lock().unwrap().push(change);
        }));

        engine.set_top_axis(Axis::horizontal(Vec::new()));
        engine.set_measure("sales");
        engine.set_left_axis(Axis::vertical(Vec::new()));

        assert_eq!(engine.version(), before + 3);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Reconfigured::TopAxis, Reconfigured::LeftAxis]
        );
    }
}
