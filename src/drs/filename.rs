//! CMIP5 file names: `variable_table_model_experiment_ensemble_START-END.ext`.
//!
//! START and END are digit strings of equal length. Their length fixes the
//! precision of both dates:
//!
//! | digits | precision |
//! | --- | --- |
//! | 4 | year |
//! | 6 | month |
//! | 8 | day |
//! | 10 | hour |
//! | 12 | minute |
//! | 14 | second |
//!
//! Fields below the precision take their first value (month 1, day 1, 00:00:00).

use std::sync::LazyLock;

use regex::Regex;

use crate::calendar::CalendarDate;
use crate::error::AxisError;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z0-9.\-]+)_([A-Za-z0-9.\-]+)_([A-Za-z0-9.\-]+)_([A-Za-z0-9.\-]+)_([A-Za-z0-9.\-]+)_([0-9]+)-([0-9]+)\.([A-Za-z0-9.]+)$",
    )
    .expect("file name pattern is a valid regex")
});

/// Resolution of the dates encoded in a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePrecision {
    pub fn from_digits(len: usize) -> Option<Self> {
        match len {
            4 => Some(DatePrecision::Year),
            6 => Some(DatePrecision::Month),
            8 => Some(DatePrecision::Day),
            10 => Some(DatePrecision::Hour),
            12 => Some(DatePrecision::Minute),
            14 => Some(DatePrecision::Second),
            _ => None,
        }
    }
}

/// The facets of a DRS file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrsName {
    pub variable: String,
    /// MIP table (`3hr`, `Amon`, `cf3hr`, ...).
    pub table: String,
    pub model: String,
    pub experiment: String,
    pub ensemble: String,
    pub start_digits: String,
    pub end_digits: String,
    pub extension: String,
}

impl DrsName {
    pub fn parse(file_name: &str) -> Result<Self, AxisError> {
        let caps = NAME_PATTERN
            .captures(file_name)
            .ok_or_else(|| AxisError::InvalidName(file_name.to_string()))?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default();

        Ok(Self {
            variable: field(1),
            table: field(2),
            model: field(3),
            experiment: field(4),
            ensemble: field(5),
            start_digits: field(6),
            end_digits: field(7),
            extension: field(8),
        })
    }

    pub fn precision(&self) -> Result<DatePrecision, AxisError> {
        let (start_len, end_len) = (self.start_digits.len(), self.end_digits.len());
        DatePrecision::from_digits(start_len)
            .filter(|_| start_len == end_len)
            .ok_or_else(|| AxisError::InvalidPrecision {
                file: self.file_stem(),
                start_len,
                end_len,
            })
    }

    /// Start and end of the period covered by the file.
    pub fn period(&self) -> Result<(CalendarDate, CalendarDate), AxisError> {
        self.precision()?;
        Ok((parse_digits(&self.start_digits)?, parse_digits(&self.end_digits)?))
    }

    fn file_stem(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}-{}",
            self.variable, self.table, self.model, self.experiment, self.ensemble, self.start_digits, self.end_digits
        )
    }
}

/// Decode `(start, end)` straight from a file name.
pub fn dates_from_filename(file_name: &str) -> Result<(CalendarDate, CalendarDate), AxisError> {
    DrsName::parse(file_name)?.period()
}

fn parse_digits(digits: &str) -> Result<CalendarDate, AxisError> {
    let field = |from: usize, to: usize, default: u32| -> Result<u32, AxisError> {
        match digits.get(from..to) {
            Some(s) => s
                .parse()
                .map_err(|_| AxisError::InvalidDate(format!("'{digits}' is not a date"))),
            None => Ok(default),
        }
    };

    let year = digits
        .get(0..4)
        .and_then(|s| s.parse::<i32>().ok())
        .ok_or_else(|| AxisError::InvalidDate(format!("'{digits}' is not a date")))?;

    Ok(CalendarDate::new(
        year,
        field(4, 6, 1)?,
        field(6, 8, 1)?,
        field(8, 10, 0)?,
        field(10, 12, 0)?,
        field(12, 14, 0)?,
    ))
}
