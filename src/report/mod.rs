//! Reporting: formatted terminal output of a batch.
//!
//! Formatting lives here so the pipeline only produces data (`OutcomeReport`).

pub mod format;

pub use format::format_batch_report;
