//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run settings (`BatchConfig`, `Mode`, `Frequency`)
//! - the shared `ProcessingContext`
//! - per-file values (`FileDescriptor`, `StoredAxis`, `CanonicalAxis`, `OutcomeReport`)
//! - batch results (`BatchEntry`, `BatchReport`)

pub mod types;

pub use types::*;
