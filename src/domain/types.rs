//! Shared domain types.
//!
//! These types flow through the per-file pipeline:
//!
//! - batch-wide settings (`BatchConfig`, `Mode`) and the shared `ProcessingContext`
//! - per-file inputs (`FileDescriptor`, `StoredAxis`)
//! - outputs (`CanonicalAxis`, `OutcomeReport`, `BatchReport`)

use std::fmt;
use std::path::PathBuf;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::calendar::{Calendar, CalendarDate, StepUnit, TimeUnits};
use crate::error::AxisError;

/// Sampling cadence of a file (global `frequency` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    SubHourly,
    ThreeHourly,
    SixHourly,
    Daily,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn from_code(code: &str) -> Result<Self, AxisError> {
        match code.trim() {
            "subhr" => Ok(Frequency::SubHourly),
            "3hr" => Ok(Frequency::ThreeHourly),
            "6hr" => Ok(Frequency::SixHourly),
            "day" => Ok(Frequency::Daily),
            "mon" => Ok(Frequency::Monthly),
            "yr" => Ok(Frequency::Yearly),
            other => Err(AxisError::UnsupportedFrequency(other.to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Frequency::SubHourly => "subhr",
            Frequency::ThreeHourly => "3hr",
            Frequency::SixHourly => "6hr",
            Frequency::Daily => "day",
            Frequency::Monthly => "mon",
            Frequency::Yearly => "yr",
        }
    }

    /// Length of one time step as `(count, unit)`.
    pub fn increment(self) -> (i64, StepUnit) {
        match self {
            Frequency::SubHourly => (30, StepUnit::Minutes),
            Frequency::ThreeHourly => (3, StepUnit::Hours),
            Frequency::SixHourly => (6, StepUnit::Hours),
            Frequency::Daily => (1, StepUnit::Days),
            Frequency::Monthly => (1, StepUnit::Months),
            Frequency::Yearly => (1, StepUnit::Years),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// What the operator asked for. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Report only; never touch files.
    Check,
    /// Rewrite files whose axis or bounds are wrong.
    Write,
    /// Rewrite every processable file regardless of the comparison.
    Force,
}

impl Mode {
    pub fn mutates(self) -> bool {
        !matches!(self, Mode::Check)
    }
}

/// Outcome of one verification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Correct,
    Mistaken,
    NotApplicable,
}

impl Verdict {
    pub fn from_match(matches: bool) -> Self {
        if matches { Verdict::Correct } else { Verdict::Mistaken }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Correct => "Correct",
            Verdict::Mistaken => "Mistaken",
            Verdict::NotApplicable => "N/A",
        }
    }
}

/// What happened to the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Untouched,
    Rewritten,
    /// Not processable (last-date check failed); never written.
    Ignored,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Untouched => "Untouched",
            Action::Rewritten => "Rewritten",
            Action::Ignored => "Ignored",
        }
    }
}

/// Batch-wide settings established from the first file of a directory.
///
/// Built once before any file is processed and only read afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingContext {
    pub frequency: Frequency,
    pub realm: String,
    pub calendar: Calendar,
    /// Declared `time.units` of the bootstrap file; canonical for the batch.
    pub units: TimeUnits,
    /// Same epoch as `units`, expressed in the frequency's step unit.
    pub frequency_units: String,
    pub mode: Mode,
}

/// Per-file facts gathered before the axis is rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    pub name: String,
    pub start: CalendarDate,
    pub end: CalendarDate,
    pub steps: usize,
    pub instant: bool,
}

/// Time values as found in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAxis {
    pub values: Vec<f64>,
    pub units: String,
    pub calendar: String,
    pub bounds: Option<Vec<[f64; 2]>>,
}

/// The time axis a file should carry, in the batch units.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalAxis {
    pub values: Vec<f64>,
    pub bounds: Vec<[f64; 2]>,
}

impl CanonicalAxis {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn flat_bounds(&self) -> Vec<f64> {
        self.bounds.iter().flatten().copied().collect()
    }
}

/// Per-file record handed to reporting/export.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport {
    pub file: String,
    pub start: CalendarDate,
    pub end: CalendarDate,
    pub steps: usize,
    pub instant: bool,
    pub last_date: Verdict,
    /// Lower bound of the last rebuilt cell, decoded back to a date.
    pub last_computed: CalendarDate,
    /// Why the file was not processable, when `last_date` is `Mistaken`.
    pub ignore_reason: Option<String>,
    pub time_axis: Verdict,
    pub time_bounds: Verdict,
    pub action: Action,
}

/// One file of a batch: its outcome, or the error that stopped it.
#[derive(Debug)]
pub struct BatchEntry {
    pub file: String,
    pub result: Result<OutcomeReport, AxisError>,
}

impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchEntry", 3)?;
        state.serialize_field("file", &self.file)?;
        state.serialize_field("outcome", &self.result.as_ref().ok())?;
        state.serialize_field("error", &self.result.as_ref().err().map(ToString::to_string))?;
        state.end()
    }
}

/// Everything a directory run produced, in enumeration order.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub context: ProcessingContext,
    pub threads: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn count_action(&self, action: Action) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(&e.result, Ok(r) if r.action == action))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_err()).count()
    }
}

/// A full run's configuration as understood by the library.
///
/// Derived from CLI flags (plus environment defaults).
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub directory: PathBuf,
    pub mode: Mode,
    /// Worker pool size; a throttle, not a correctness knob.
    pub threads: usize,
    pub verbose: bool,
    /// Regex the directory path must match before anything is read.
    pub drs_pattern: Option<String>,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
