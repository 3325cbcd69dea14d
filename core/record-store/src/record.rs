//! FILENAME: core/record-store/src/record.rs
//! PURPOSE: The read-only view the engine has of a single record.

use std::collections::HashMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Field access by name.
///
/// A missing field and a field holding `Value::Empty` are both "null" to the
/// engine: such a record never matches a tuple on that field.
pub trait Record {
    fn get(&self, field: &str) -> Option<&Value>;
}

impl<R: Record + ?Sized> Record for &R {
    fn get(&self, field: &str) -> Option<&Value> {
        (**self).get(field)
    }
}

impl<S: std::hash::BuildHasher> Record for HashMap<String, Value, S> {
    fn get(&self, field: &str) -> Option<&Value> {
        HashMap::get(self, field)
    }
}

/// A record backed by a field-name map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    fields: FxHashMap<String, Value>,
}

impl MapRecord {
    pub fn new() -> Self {
        MapRecord {
            fields: FxHashMap::default(),
        }
    }

    /// Builder-style setter, convenient for fixtures.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Record for MapRecord {
    fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapRecord {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
