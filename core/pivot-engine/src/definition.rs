//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a cross-tabulation:
//! which fields group the rows and columns, in which direction each group
//! sorts, which field is measured and how it is reduced.
//! These structures are designed to be:
//! - Serializable (JSON configuration supplied by the hosting application)
//! - Plain data, with no references to records

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::Result;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Built-in aggregation functions for the measure field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    #[default]
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl AggregationType {
    pub const ALL: [AggregationType; 5] = [
        AggregationType::Sum,
        AggregationType::Avg,
        AggregationType::Min,
        AggregationType::Max,
        AggregationType::Count,
    ];

    /// Registry key of the aggregation.
    pub fn name(&self) -> &'static str {
        match self {
            AggregationType::Sum => "sum",
            AggregationType::Avg => "avg",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
            AggregationType::Count => "count",
        }
    }

    /// Looks up a built-in by its registry key. Keys are case-sensitive.
    pub fn from_name(name: &str) -> Option<AggregationType> {
        AggregationType::ALL.into_iter().find(|agg| agg.name() == name)
    }
}

// ============================================================================
// DIMENSIONS
// ============================================================================

/// Sort direction for the distinct values of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

/// A single grouping criterion within an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// Record field to group by.
    pub field: String,

    /// Sort direction of this field's values.
    #[serde(default)]
    pub direction: SortDirection,

    /// Column width for row-axis headers. A rendering hint only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl Dimension {
    pub fn new(field: impl Into<String>) -> Self {
        Dimension {
            field: field.into(),
            direction: SortDirection::Ascending,
            width: None,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Dimension {
            direction: SortDirection::Descending,
            ..Dimension::new(field)
        }
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// A dimension with a blank field name cannot group anything.
    pub fn is_blank(&self) -> bool {
        self.field.trim().is_empty()
    }
}

/// Which side of the grid an axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Row headers (the left axis).
    #[default]
    Vertical,
    /// Column headers (the top axis).
    Horizontal,
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

fn default_aggregator() -> String {
    AggregationType::Sum.name().to_string()
}

/// The complete, serializable definition of a cross-tabulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotDefinition {
    /// Row grouping (outer to inner).
    pub left_axis: Axis,

    /// Column grouping (outer to inner).
    pub top_axis: Axis,

    /// Field whose values are aggregated into each cell.
    #[serde(default)]
    pub measure: Option<String>,

    /// Aggregator key: a built-in name or a name registered on the engine.
    #[serde(default = "default_aggregator")]
    pub aggregator: String,

    /// Text shown for cells that hold no data.
    #[serde(default)]
    pub empty_cell_text: Option<String>,
}

impl PivotDefinition {
    pub fn new(left_axis: Axis, top_axis: Axis) -> Self {
        PivotDefinition {
            left_axis,
            top_axis,
            measure: None,
            aggregator: default_aggregator(),
            empty_cell_text: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
