//! FILENAME: core/pivot-engine/src/axis.rs
//! Axis - Derives the tuples (header combinations) of one side of the grid.
//!
//! Algorithm:
//! 1. Partition the record indices by the outermost dimension's value
//! 2. Sort the distinct values per that dimension's direction
//! 3. Recurse into each partition for the next dimension
//! 4. Every leaf of the descent becomes one tuple
//!
//! Partitions hold indices into the borrowed record slice, so a level only
//! ever looks at the records that match every value already fixed above it.
//! Records with a null value on a dimension drop out at that level.

use log::{trace, warn};
use record_store::{Record, Value, ValueKey};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::{Dimension, Orientation, SortDirection};

// ============================================================================
// TUPLES
// ============================================================================

/// One fixed (field, value) pair of a tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleValue {
    pub field: String,
    pub value: Value,
}

/// One concrete combination of dimension values on an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    /// Fixed values, outermost dimension first.
    pub values: SmallVec<[TupleValue; 4]>,

    /// Number of dimensions fixed by this tuple (0 = no grouping).
    pub depth: usize,
}

impl Tuple {
    /// The tuple of an axis without dimensions. Accepts every record.
    pub fn all() -> Self {
        Tuple {
            values: SmallVec::new(),
            depth: 0,
        }
    }

    /// True iff the record holds, for every fixed field, a value strictly
    /// equal to the tuple's value.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.values.iter().all(|tv| {
            record
                .get(&tv.field)
                .is_some_and(|value| value.strict_eq(&tv.value))
        })
    }

    /// The matcher as a standalone predicate.
    pub fn matcher(&self) -> impl Fn(&dyn Record) -> bool + '_ {
        move |record: &dyn Record| self.matches(record)
    }

    /// Value fixed for `field`, if this tuple groups on it.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|tv| tv.field == field)
            .map(|tv| &tv.value)
    }

    /// Display labels, one per fixed dimension.
    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(|tv| tv.value.display_value()).collect()
    }

    /// Single-line label for headers. The ungrouped tuple reads "Total".
    pub fn label(&self) -> String {
        if self.values.is_empty() {
            return "Total".to_string();
        }
        self.labels().join(" / ")
    }
}

// ============================================================================
// AXIS
// ============================================================================

/// An ordered list of dimensions applied to one side of the grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default)]
    pub orientation: Orientation,

    #[serde(default)]
    dimensions: Vec<Dimension>,
}

impl Axis {
    pub fn new(orientation: Orientation, dimensions: Vec<Dimension>) -> Self {
        Axis {
            orientation,
            dimensions,
        }
    }

    /// Row axis.
    pub fn vertical(dimensions: Vec<Dimension>) -> Self {
        Axis::new(Orientation::Vertical, dimensions)
    }

    /// Column axis.
    pub fn horizontal(dimensions: Vec<Dimension>) -> Self {
        Axis::new(Orientation::Horizontal, dimensions)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Replaces the dimension list. Tuples are derived again on next use.
    pub fn set_dimensions(&mut self, dimensions: Vec<Dimension>) {
        self.dimensions = dimensions;
    }

    /// Derives the ordered tuples present in `records`.
    ///
    /// An axis without (usable) dimensions yields exactly one tuple that
    /// matches every record. Blank field names are skipped.
    pub fn tuples<R: Record>(&self, records: &[R]) -> Vec<Tuple> {
        let dimensions: Vec<&Dimension> = self
            .dimensions
            .iter()
            .filter(|dim| {
                if dim.is_blank() {
                    warn!(target: "pivot", "skipping dimension with blank field name");
                    false
                } else {
                    true
                }
            })
            .collect();

        if dimensions.is_empty() {
            return vec![Tuple::all()];
        }

        let candidates: Vec<usize> = (0..records.len()).collect();
        let mut path: SmallVec<[TupleValue; 4]> = SmallVec::new();
        let mut tuples = Vec::new();
        collect_level(records, &dimensions, 0, &candidates, &mut path, &mut tuples);

        trace!(
            target: "pivot",
            "{:?} axis: {} dimensions, {} tuples",
            self.orientation,
            dimensions.len(),
            tuples.len()
        );
        tuples
    }
}

/// Recursively builds one level of tuples under the values fixed in `path`.
fn collect_level<R: Record>(
    records: &[R],
    dimensions: &[&Dimension],
    level: usize,
    candidates: &[usize],
    path: &mut SmallVec<[TupleValue; 4]>,
    tuples: &mut Vec<Tuple>,
) {
    let dimension = dimensions[level];
    let groups = partition_by_value(records, candidates, dimension);
    let is_leaf = level + 1 == dimensions.len();

    for (key, members) in groups {
        path.push(TupleValue {
            field: dimension.field.clone(),
            value: key.to_value(),
        });

        if is_leaf {
            tuples.push(Tuple {
                values: path.clone(),
                depth: path.len(),
            });
        } else {
            collect_level(records, dimensions, level + 1, &members, path, tuples);
        }

        path.pop();
    }
}

/// Groups candidate record indices by their value for `dimension.field`,
/// sorted per the dimension's direction. Null values are left out.
fn partition_by_value<R: Record>(
    records: &[R],
    candidates: &[usize],
    dimension: &Dimension,
) -> Vec<(ValueKey, Vec<usize>)> {
    let mut groups: FxHashMap<ValueKey, Vec<usize>> = FxHashMap::default();

    for &index in candidates {
        let key = records[index]
            .get(&dimension.field)
            .and_then(ValueKey::from_value);
        if let Some(key) = key {
            groups.entry(key).or_default().push(index);
        }
    }

    let mut sorted: Vec<(ValueKey, Vec<usize>)> = groups.into_iter().collect();
    match dimension.direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| a.0.cmp(&b.0)),
        SortDirection::Descending => sorted.sort_by(|a, b| b.0.cmp(&a.0)),
    }
    sorted
}
