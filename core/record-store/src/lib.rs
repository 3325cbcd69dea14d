//! FILENAME: core/record-store/src/lib.rs
//! PURPOSE: Shared record and value types for the cross-tabulation engine.
//! CONTEXT: The pivot engine never owns data. It borrows records from a
//! `RecordStore` for the duration of one calculation and reads fields
//! through the `Record` trait defined here.

pub mod error;
pub mod record;
pub mod store;
pub mod value;

pub use error::StoreError;
pub use record::{MapRecord, Record};
pub use store::{RecordStore, Store};
pub use value::{OrderedFloat, Value, ValueKey};
