//! Input/output helpers.
//!
//! - dataset storage seam (`store`) with an on-disk JSON backend (`json`) and an in-memory test backend (`memory`)
//! - batch report exports (CSV/JSON) (`export`)

pub mod export;
pub mod json;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use export::*;
pub use json::{JsonDataset, JsonDirectory};
#[cfg(test)]
pub use memory::{MemoryDataset, MemorySource};
pub use store::{Access, Dataset, DatasetDoc, DatasetSource, StoreError, TIME, TIME_BOUNDS, Variable};
