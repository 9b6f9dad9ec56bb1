//! Time axis reconstruction, verification, and rewrite.
//!
//! - `builder`: canonical axis from start date, step count, and frequency
//! - `verify`: last-date check and exact comparison with stored values
//! - `rewrite`: mode-driven rewrite decision and commit to storage

pub mod builder;
pub mod rewrite;
pub mod verify;

pub use builder::build_axis;
pub use rewrite::{Decision, commit, decide};
pub use verify::{Verification, verify};
