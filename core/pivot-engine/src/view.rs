//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - The calculated output handed to a rendering layer.
//!
//! `CrossTab` keeps the raw aggregated values. Formatting happens only in
//! `render`, so rounding for display never feeds back into aggregation.

use std::sync::Arc;

use record_store::Value;
use serde::{Deserialize, Serialize};

use crate::axis::Tuple;

/// Text shown for cells without data unless the caller chooses another.
pub const DEFAULT_EMPTY_CELL_TEXT: &str = "n/a";

/// Per-cell display transform applied at render time.
pub type CellRenderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Renderer that shows numbers with a fixed number of decimals.
pub fn fixed_decimals(places: usize) -> CellRenderer {
    Arc::new(move |value: &Value| match value {
        Value::Number(n) => format!("{:.*}", places, n),
        other => other.display_value(),
    })
}

/// Renders one value. `Value::Empty` always becomes `empty_text`.
pub fn render_value(value: &Value, renderer: Option<&CellRenderer>, empty_text: &str) -> String {
    if value.is_empty() {
        return empty_text.to_string();
    }
    match renderer {
        Some(render) => render(value),
        None => value.display_value(),
    }
}

// ============================================================================
// CROSS TAB
// ============================================================================

/// The aggregated matrix plus the tuples labelling its rows and columns.
/// `cells[row][col]` pairs `left_tuples[row]` with `top_tuples[col]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossTab {
    pub left_tuples: Vec<Tuple>,
    pub top_tuples: Vec<Tuple>,
    pub cells: Vec<Vec<Value>>,
}

impl CrossTab {
    /// Result for an empty record collection.
    pub fn empty() -> Self {
        CrossTab::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.left_tuples.len()
    }

    pub fn column_count(&self) -> usize {
        self.top_tuples.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.cells.get(row).and_then(|cells| cells.get(col))
    }

    pub fn row_labels(&self) -> Vec<String> {
        self.left_tuples.iter().map(Tuple::label).collect()
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.top_tuples.iter().map(Tuple::label).collect()
    }

    /// Display text for every cell, row-major.
    pub fn render(&self, renderer: Option<&CellRenderer>, empty_text: &str) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| render_value(value, renderer, empty_text))
                    .collect()
            })
            .collect()
    }
}

/// Aggregates over whole rows, whole columns and everything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// One value per left tuple.
    pub rows: Vec<Value>,
    /// One value per top tuple.
    pub columns: Vec<Value>,
    pub grand: Value,
}
