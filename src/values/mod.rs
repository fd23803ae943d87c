//! Attribute values: display flattening and input parsing

pub mod flatten;
pub mod input;

pub use flatten::{flatten_fields, flatten_record, FlatRecord};
pub use input::{require_values, resolve_values, ValueError, Values};
