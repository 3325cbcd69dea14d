//! FILENAME: core/record-store/src/value.rs
//! PURPOSE: Scalar values held by record fields and produced by aggregation.
//! CONTEXT: `Value` is what callers see. `ValueKey` is the normalized,
//! hashable form used to collect distinct dimension values. Both follow the
//! same strict-equality rule: no coercion across variants.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single scalar field value.
///
/// `Empty` stands for null/undefined. It is never part of a tuple and, as an
/// aggregation result, means "no data" (for example `avg` of an empty cell).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Strict equality used by tuple matchers.
    /// Different variants are never equal and `Empty` equals nothing,
    /// including another `Empty`. NaN equals NaN so that a NaN group can
    /// still match its own records.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }

    /// Numeric view of the value for arithmetic aggregators.
    /// Anything that cannot be read as a number becomes NaN, which then
    /// propagates through the aggregate unchanged.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Value::Date(_) | Value::Empty => f64::NAN,
        }
    }

    /// Returns the display value as a String.
    pub fn display_value(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

// ============================================================================
// ORDERED FLOAT
// ============================================================================

/// Wrapper around f64 that implements Eq, Ord and Hash for use as map keys.
/// NaN values are treated as equal to each other and sort after all numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // 0.0 and -0.0 compare equal
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.is_nan(), other.0.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal),
        }
    }
}

// ============================================================================
// VALUE KEY
// ============================================================================

/// A normalized, hashable, totally ordered representation of a non-empty value.
/// Used as keys when collecting the distinct values of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Number(OrderedFloat),
    Date(NaiveDate),
    Text(String),
    Boolean(bool),
}

impl ValueKey {
    /// Returns `None` for `Value::Empty`; null values never form a group.
    pub fn from_value(value: &Value) -> Option<ValueKey> {
        match value {
            Value::Empty => None,
            Value::Number(n) => Some(ValueKey::Number(OrderedFloat(*n))),
            Value::Date(d) => Some(ValueKey::Date(*d)),
            Value::Text(s) => Some(ValueKey::Text(s.clone())),
            Value::Boolean(b) => Some(ValueKey::Boolean(*b)),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ValueKey::Number(n) => Value::Number(n.as_f64()),
            ValueKey::Date(d) => Value::Date(*d),
            ValueKey::Text(s) => Value::Text(s.clone()),
            ValueKey::Boolean(b) => Value::Boolean(*b),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            ValueKey::Number(_) => 0,
            ValueKey::Date(_) => 1,
            ValueKey::Text(_) => 2,
            ValueKey::Boolean(_) => 3,
        }
    }
}

impl PartialOrd for ValueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValueKey {
    /// Numbers sort before dates, dates before text, text before booleans.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ValueKey::Number(a), ValueKey::Number(b)) => a.cmp(b),
            (ValueKey::Date(a), ValueKey::Date(b)) => a.cmp(b),
            (ValueKey::Text(a), ValueKey::Text(b)) => a.cmp(b),
            (ValueKey::Boolean(a), ValueKey::Boolean(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}
