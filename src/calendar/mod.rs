//! CF calendars and time units.
//!
//! This is the calendar layer the axis code is written against:
//!
//! - `Calendar`: a named CF calendar with exact day-number arithmetic
//! - `CalendarDate`: a broken-down date, only meaningful under a calendar
//! - `TimeUnits`: `"<unit> since <epoch>"` strings with encode/decode
//!
//! Arithmetic is integer seconds end to end. Floating point only appears when a
//! date is encoded into (or decoded from) a numeric file value.

pub mod date;
pub mod kind;
pub mod units;

pub use date::CalendarDate;
pub use kind::{Calendar, StepUnit};
pub use units::{TimeUnit, TimeUnits};
