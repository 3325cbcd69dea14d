//! FILENAME: core/record-store/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Record {index} has an unsupported value in field '{field}'")]
    UnsupportedValue { index: usize, field: String },
}
