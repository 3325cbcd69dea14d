//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

/// Error type returned by custom aggregator functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("No measure field is set")]
    MissingMeasure,

    #[error("Unknown aggregator: {0}")]
    UnknownAggregator(String),

    #[error("Aggregator '{aggregator}' failed: {source}")]
    Aggregation {
        aggregator: String,
        #[source]
        source: BoxError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PivotError>;
