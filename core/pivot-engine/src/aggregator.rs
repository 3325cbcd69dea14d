//! FILENAME: core/pivot-engine/src/aggregator.rs
//! Aggregators - Reduce the records of one cell to a single value.
//!
//! Built-in reductions are a closed enum (`AggregationType`). Callers extend
//! the set with `CustomAggregator` functions, either passed directly to the
//! engine or registered under a name on an engine-owned `AggregatorRegistry`.
//! There is no process-wide registry.
//!
//! Empty-input conventions:
//! - `sum` → 0
//! - `count` → 0
//! - `avg` / `min` / `max` → `Value::Empty` ("no data")

use std::fmt;
use std::sync::Arc;

use record_store::{Record, Value};
use rustc_hash::FxHashMap;

use crate::definition::AggregationType;
use crate::error::{BoxError, PivotError, Result};

/// Signature of a user-supplied reduction.
pub type AggregateFn = dyn Fn(&[&dyn Record], &str) -> std::result::Result<Value, BoxError> + Send + Sync;

/// A user-supplied aggregation function.
/// The return value is trusted as-is; errors propagate to `extract_data`.
#[derive(Clone)]
pub struct CustomAggregator {
    func: Arc<AggregateFn>,
}

impl CustomAggregator {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[&dyn Record], &str) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        CustomAggregator {
            func: Arc::new(func),
        }
    }

    pub fn call(&self, records: &[&dyn Record], measure: &str) -> std::result::Result<Value, BoxError> {
        (self.func)(records, measure)
    }
}

impl fmt::Debug for CustomAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomAggregator(..)")
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// The aggregator currently selected on an engine.
#[derive(Debug, Clone)]
pub enum Aggregator {
    Builtin(AggregationType),
    /// Resolved against the registry when the data is extracted.
    Named(String),
    /// Called directly, bypassing the registry.
    Custom(CustomAggregator),
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator::Builtin(AggregationType::Sum)
    }
}

impl From<AggregationType> for Aggregator {
    fn from(agg: AggregationType) -> Self {
        Aggregator::Builtin(agg)
    }
}

impl From<&str> for Aggregator {
    fn from(name: &str) -> Self {
        match AggregationType::from_name(name) {
            Some(agg) => Aggregator::Builtin(agg),
            None => Aggregator::Named(name.to_string()),
        }
    }
}

impl From<String> for Aggregator {
    fn from(name: String) -> Self {
        match AggregationType::from_name(&name) {
            Some(agg) => Aggregator::Builtin(agg),
            None => Aggregator::Named(name),
        }
    }
}

impl From<CustomAggregator> for Aggregator {
    fn from(custom: CustomAggregator) -> Self {
        Aggregator::Custom(custom)
    }
}

/// An aggregator ready to run.
#[derive(Debug, Clone)]
pub enum ResolvedAggregator<'a> {
    Builtin(AggregationType),
    Custom {
        name: &'a str,
        func: &'a CustomAggregator,
    },
}

impl ResolvedAggregator<'_> {
    pub fn name(&self) -> &str {
        match self {
            ResolvedAggregator::Builtin(agg) => agg.name(),
            ResolvedAggregator::Custom { name, .. } => *name,
        }
    }

    pub fn apply(&self, records: &[&dyn Record], measure: &str) -> Result<Value> {
        match self {
            ResolvedAggregator::Builtin(agg) => Ok(aggregate(*agg, records, measure)),
            ResolvedAggregator::Custom { name, func } => {
                func.call(records, measure)
                    .map_err(|source| PivotError::Aggregation {
                        aggregator: name.to_string(),
                        source,
                    })
            }
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Name → function table for custom aggregators.
#[derive(Debug, Clone, Default)]
pub struct AggregatorRegistry {
    custom: FxHashMap<String, CustomAggregator>,
}

impl AggregatorRegistry {
    pub fn new() -> Self {
        AggregatorRegistry::default()
    }

    /// Registers `func` under `name`, replacing any earlier registration.
    /// Built-in names are reserved and always resolve to the built-in.
    pub fn register_type(&mut self, name: impl Into<String>, func: CustomAggregator) {
        let name = name.into();
        if AggregationType::from_name(&name).is_some() {
            log::warn!(target: "pivot", "aggregator '{}' shadows a built-in and will never resolve", name);
        }
        self.custom.insert(name, func);
    }

    pub fn unregister(&mut self, name: &str) -> Option<CustomAggregator> {
        self.custom.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        AggregationType::from_name(name).is_some() || self.custom.contains_key(name)
    }

    pub fn resolve<'a>(&'a self, aggregator: &'a Aggregator) -> Result<ResolvedAggregator<'a>> {
        match aggregator {
            Aggregator::Builtin(agg) => Ok(ResolvedAggregator::Builtin(*agg)),
            Aggregator::Custom(func) => Ok(ResolvedAggregator::Custom {
                name: "custom",
                func,
            }),
            Aggregator::Named(name) => {
                if let Some(agg) = AggregationType::from_name(name) {
                    return Ok(ResolvedAggregator::Builtin(agg));
                }
                self.custom
                    .get_key_value(name.as_str())
                    .map(|(name, func)| ResolvedAggregator::Custom {
                        name: name.as_str(),
                        func,
                    })
                    .ok_or_else(|| PivotError::UnknownAggregator(name.clone()))
            }
        }
    }
}

// ============================================================================
// BUILT-IN REDUCTIONS
// ============================================================================

/// Numeric value of the measure field; missing fields read as NaN.
fn measure_of(record: &dyn Record, measure: &str) -> f64 {
    record.get(measure).map_or(f64::NAN, Value::as_number)
}

/// Min/max fold that lets NaN win, so bad data stays visible.
fn extremum(records: &[&dyn Record], measure: &str, pick: fn(f64, f64) -> f64) -> Value {
    let mut values = records.iter().map(|r| measure_of(*r, measure));
    let Some(first) = values.next() else {
        return Value::Empty;
    };
    let result = values.fold(first, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            pick(acc, v)
        }
    });
    Value::Number(result)
}

/// Runs a built-in aggregation over a cell's records.
pub fn aggregate(agg: AggregationType, records: &[&dyn Record], measure: &str) -> Value {
    match agg {
        AggregationType::Sum => {
            Value::Number(records.iter().map(|r| measure_of(*r, measure)).sum())
        }
        AggregationType::Avg => {
            if records.is_empty() {
                return Value::Empty;
            }
            let sum: f64 = records.iter().map(|r| measure_of(*r, measure)).sum();
            Value::Number(sum / records.len() as f64)
        }
        AggregationType::Min => extremum(records, measure, f64::min),
        AggregationType::Max => extremum(records, measure, f64::max),
        AggregationType::Count => Value::Number(records.len() as f64),
    }
}
