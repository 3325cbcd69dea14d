//! FILENAME: core/pivot-engine/src/lib.rs
//! Cross-tabulation engine.
//!
//! Groups a flat record collection on two independent axes and reduces
//! every (row tuple, column tuple) intersection to one value. Records come
//! from `record-store`; the engine never owns them.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the cross tab IS)
//! - `axis`: Tuple derivation per axis (HOW rows and columns are found)
//! - `aggregator`: Cell reductions (HOW a cell becomes a value)
//! - `engine`: Calculation engine (HOW we calculate)
//! - `view`: Output matrix and render hook (WHAT we display)

pub mod aggregator;
pub mod axis;
pub mod definition;
pub mod engine;
pub mod error;
pub mod view;

pub use aggregator::{
    aggregate, AggregateFn, Aggregator, AggregatorRegistry, CustomAggregator, ResolvedAggregator,
};
pub use axis::{Axis, Tuple, TupleValue};
pub use definition::*;
pub use engine::{calculate_pivot, PivotEngine, Reconfigured, RefreshHook};
pub use error::{BoxError, PivotError, Result};
pub use view::*;
