//! CF time-unit strings (`"days since 1850-01-01 00:00:00"`).

use serde::{Serialize, Serializer};

use crate::calendar::{Calendar, CalendarDate, StepUnit};
use crate::error::AxisError;

/// Unit of a numeric time value stored in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn seconds(self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3600,
            TimeUnit::Days => 86_400,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeUnit::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(TimeUnit::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeUnit::Hours),
            "days" | "day" | "d" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

/// Parsed `"<unit> since <epoch>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub epoch: CalendarDate,
    raw: String,
}

impl TimeUnits {
    pub fn parse(raw: &str) -> Result<Self, AxisError> {
        let invalid = || AxisError::InvalidUnits(raw.to_string());

        let mut words = raw.split_whitespace();
        let unit = words.next().and_then(TimeUnit::from_word).ok_or_else(invalid)?;
        if !words.next().is_some_and(|w| w.eq_ignore_ascii_case("since")) {
            return Err(invalid());
        }
        let rest: Vec<&str> = words.collect();
        let epoch = parse_epoch(&rest).ok_or_else(invalid)?;

        Ok(Self {
            unit,
            epoch,
            raw: raw.trim().to_string(),
        })
    }

    /// The units string as it appears in the file.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Same epoch, different unit word: `"days since X"` -> `"months since X"`.
    pub fn with_step_unit(&self, step: StepUnit) -> String {
        let reference = self
            .raw
            .split_once(char::is_whitespace)
            .map(|(_, tail)| tail.trim_start())
            .unwrap_or_default();
        format!("{} {reference}", step.as_str())
    }

    /// Numeric offset of `date` from the epoch, in this unit.
    pub fn encode(&self, date: &CalendarDate, calendar: Calendar) -> Result<f64, AxisError> {
        let seconds = calendar.seconds_between(&self.epoch, date)?;
        Ok(seconds as f64 / self.unit.seconds() as f64)
    }

    /// Inverse of `encode`, rounded to the nearest whole second.
    pub fn decode(&self, value: f64, calendar: Calendar) -> Result<CalendarDate, AxisError> {
        let seconds = value * self.unit.seconds() as f64;
        if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
            return Err(AxisError::InvalidDate(format!(
                "{value} {} cannot be converted to a date",
                self.raw
            )));
        }
        calendar.add_seconds(&self.epoch, seconds.round() as i64)
    }
}

impl Serialize for TimeUnits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn parse_epoch(tokens: &[&str]) -> Option<CalendarDate> {
    let (first, mut rest) = tokens.split_first()?;

    let (date_part, mut time_part) = match first.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (*first, None),
    };
    if time_part.is_none() {
        if let Some((next, tail)) = rest.split_first() {
            if next.contains(':') {
                time_part = Some(*next);
                rest = tail;
            }
        }
    }
    // Only an explicit UTC marker may follow.
    match rest {
        [] => {}
        [zone] if matches!(zone.to_ascii_uppercase().as_str(), "Z" | "UTC" | "GMT" | "+00:00" | "00:00") => {}
        _ => return None,
    }

    let mut ymd = date_part.splitn(3, '-');
    let year: i32 = ymd.next()?.parse().ok()?;
    let month: u32 = ymd.next()?.parse().ok()?;
    let day: u32 = ymd.next()?.parse().ok()?;

    let (hour, minute, second) = match time_part {
        None => (0, 0, 0),
        Some(t) => parse_clock(t.trim_end_matches(['Z', 'z']))?,
    };

    Some(CalendarDate::new(year, month, day, hour, minute, second))
}

fn parse_clock(text: &str) -> Option<(u32, u32, u32)> {
    let mut parts = text.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next().unwrap_or("0").parse().ok()?;
    let second = match parts.next() {
        None => 0,
        Some(s) => {
            let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
            // Sub-second epochs are not representable; tolerate ".0".
            if !frac.chars().all(|c| c == '0') {
                return None;
            }
            whole.parse().ok()?
        }
    };
    if parts.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}
