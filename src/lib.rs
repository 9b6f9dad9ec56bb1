//! `time-axis` library crate.
//!
//! The binary (`time-axis`) is a thin wrapper around this library so that:
//!
//! - the axis algorithms are testable without spawning processes
//! - the per-file pipeline can run serially or on a worker pool unchanged
//! - storage backends can be swapped behind the `io::store` traits

pub mod app;
pub mod axis;
pub mod calendar;
pub mod cli;
pub mod domain;
pub mod drs;
pub mod error;
pub mod io;
pub mod report;
