//! FILENAME: core/record-store/src/store.rs
//! PURPOSE: Record collections that can be handed to the engine.
//! CONTEXT: The engine only needs "get all records". Anything that can lend
//! out a slice of records implements `RecordStore`.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::{MapRecord, Record};
use crate::value::Value;

pub trait RecordStore {
    type Record: Record;

    fn records(&self) -> &[Self::Record];
}

impl<R: Record> RecordStore for [R] {
    type Record = R;

    fn records(&self) -> &[R] {
        self
    }
}

impl<R: Record> RecordStore for Vec<R> {
    type Record = R;

    fn records(&self) -> &[R] {
        self.as_slice()
    }
}

/// An ordered, in-memory collection of `MapRecord`s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    records: Vec<MapRecord>,
}

impl Store {
    pub fn new() -> Self {
        Store {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: MapRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Loads a JSON array of flat objects.
    /// `null` becomes `Value::Empty`; nested arrays or objects are rejected.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let parsed: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut store = Store::new();
        store.records.reserve(parsed.len());

        for (index, item) in parsed.into_iter().enumerate() {
            let object = match item {
                serde_json::Value::Object(map) => map,
                _ => return Err(StoreError::NotAnObject { index }),
            };

            let mut record = MapRecord::new();
            for (field, raw) in object {
                let value = match raw {
                    serde_json::Value::Null => Value::Empty,
                    serde_json::Value::Bool(b) => Value::Boolean(b),
                    serde_json::Value::Number(n) => match n.as_f64() {
                        Some(f) => Value::Number(f),
                        None => return Err(StoreError::UnsupportedValue { index, field }),
                    },
                    serde_json::Value::String(s) => Value::Text(s),
                    serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                        return Err(StoreError::UnsupportedValue { index, field });
                    }
                };
                record.set(&field, value);
            }
            store.push(record);
        }

        Ok(store)
    }
}

impl RecordStore for Store {
    type Record = MapRecord;

    fn records(&self) -> &[MapRecord] {
        &self.records
    }
}

impl FromIterator<MapRecord> for Store {
    fn from_iter<I: IntoIterator<Item = MapRecord>>(iter: I) -> Self {
        Store {
            records: iter.into_iter().collect(),
        }
    }
}
