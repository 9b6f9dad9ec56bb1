//! CF calendar definitions and exact date arithmetic.
//!
//! Every calendar maps a date onto a continuous day number. Sub-day arithmetic
//! is done on `day_number * 86_400 + seconds_of_day`, so adding N hours never
//! accumulates floating error. Month and year steps are field arithmetic.
//!
//! Proleptic Gregorian day numbers come from `chrono`; Julian and the fixed
//! length calendars use closed-form integer formulas.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::calendar::CalendarDate;
use crate::error::AxisError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Offset between chrono's `num_days_from_ce` (0001-01-01 = 1) and the
/// Julian day number.
const CE_TO_JDN: i64 = 1_721_425;

/// Julian day number of 1582-10-15, the first Gregorian day of the mixed calendar.
const GREGORIAN_SWITCH_JDN: i64 = 2_299_161;

const DAYS_NOLEAP: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_LEAP: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const CUM_NOLEAP: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const CUM_LEAP: [u32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Supported CF calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calendar {
    /// Julian before 1582-10-15, Gregorian from then on (`standard`, `gregorian`).
    Standard,
    ProlepticGregorian,
    /// `noleap` / `365_day`.
    NoLeap,
    /// `all_leap` / `366_day`.
    AllLeap,
    /// Twelve 30-day months.
    Day360,
    Julian,
}

/// Units the axis builder steps in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepUnit {
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl StepUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            StepUnit::Minutes => "minutes",
            StepUnit::Hours => "hours",
            StepUnit::Days => "days",
            StepUnit::Months => "months",
            StepUnit::Years => "years",
        }
    }
}

impl Calendar {
    /// Resolve a CF `calendar` attribute value.
    pub fn from_name(name: &str) -> Result<Self, AxisError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" => Ok(Calendar::Standard),
            "proleptic_gregorian" => Ok(Calendar::ProlepticGregorian),
            "noleap" | "365_day" => Ok(Calendar::NoLeap),
            "all_leap" | "366_day" => Ok(Calendar::AllLeap),
            "360_day" => Ok(Calendar::Day360),
            "julian" => Ok(Calendar::Julian),
            _ => Err(AxisError::UnsupportedCalendar(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Calendar::Standard => "standard",
            Calendar::ProlepticGregorian => "proleptic_gregorian",
            Calendar::NoLeap => "noleap",
            Calendar::AllLeap => "all_leap",
            Calendar::Day360 => "360_day",
            Calendar::Julian => "julian",
        }
    }

    pub fn is_leap_year(self, year: i32) -> bool {
        match self {
            Calendar::NoLeap | Calendar::Day360 => false,
            Calendar::AllLeap => true,
            Calendar::Julian => julian_leap(year),
            Calendar::ProlepticGregorian => gregorian_leap(year),
            Calendar::Standard if year < 1582 => julian_leap(year),
            Calendar::Standard => gregorian_leap(year),
        }
    }

    /// Number of days in `month` (1-based). Returns 0 for an invalid month.
    pub fn days_in_month(self, year: i32, month: u32) -> u32 {
        if !(1..=12).contains(&month) {
            return 0;
        }
        let idx = (month - 1) as usize;
        match self {
            Calendar::Day360 => 30,
            _ if self.is_leap_year(year) => DAYS_LEAP[idx],
            _ => DAYS_NOLEAP[idx],
        }
    }

    /// Check that `date` exists in this calendar.
    pub fn validate(self, date: &CalendarDate) -> Result<(), AxisError> {
        let in_range = (1..=12).contains(&date.month)
            && date.day >= 1
            && date.day <= self.days_in_month(date.year, date.month)
            && date.hour < 24
            && date.minute < 60
            && date.second < 60;
        if !in_range || (self == Calendar::Standard && in_gregorian_gap(date)) {
            return Err(AxisError::InvalidDate(format!(
                "{date} does not exist in the {} calendar",
                self.name()
            )));
        }
        Ok(())
    }

    /// Signed number of seconds from `from` to `to`.
    pub fn seconds_between(self, from: &CalendarDate, to: &CalendarDate) -> Result<i64, AxisError> {
        Ok(self.absolute_seconds(to)? - self.absolute_seconds(from)?)
    }

    pub fn add_seconds(self, date: &CalendarDate, seconds: i64) -> Result<CalendarDate, AxisError> {
        let total = self
            .absolute_seconds(date)?
            .checked_add(seconds)
            .ok_or_else(|| overflow(date))?;
        let (year, month, day) = self.date_from_day_number(total.div_euclid(SECONDS_PER_DAY))?;
        let sod = total.rem_euclid(SECONDS_PER_DAY);
        Ok(CalendarDate::new(
            year,
            month,
            day,
            (sod / 3600) as u32,
            (sod % 3600 / 60) as u32,
            (sod % 60) as u32,
        ))
    }

    /// Add `amount` steps of `unit` to `date`.
    pub fn add(self, date: &CalendarDate, amount: i64, unit: StepUnit) -> Result<CalendarDate, AxisError> {
        let seconds_per = match unit {
            StepUnit::Minutes => 60,
            StepUnit::Hours => 3600,
            StepUnit::Days => SECONDS_PER_DAY,
            StepUnit::Months => return self.add_months(date, amount),
            StepUnit::Years => {
                let months = amount.checked_mul(12).ok_or_else(|| overflow(date))?;
                return self.add_months(date, months);
            }
        };
        let seconds = amount.checked_mul(seconds_per).ok_or_else(|| overflow(date))?;
        self.add_seconds(date, seconds)
    }

    /// Month arithmetic keeps the time of day; a day past the end of the target
    /// month is clamped to its last day.
    fn add_months(self, date: &CalendarDate, amount: i64) -> Result<CalendarDate, AxisError> {
        self.validate(date)?;
        let total = i64::from(date.year) * 12 + i64::from(date.month) - 1 + amount;
        let year = i32::try_from(total.div_euclid(12)).map_err(|_| overflow(date))?;
        let month = (total.rem_euclid(12) + 1) as u32;
        let out = CalendarDate {
            year,
            month,
            day: date.day.min(self.days_in_month(year, month)),
            ..*date
        };
        self.validate(&out)?;
        Ok(out)
    }

    fn absolute_seconds(self, date: &CalendarDate) -> Result<i64, AxisError> {
        self.validate(date)?;
        let days = self.day_number(date)?;
        Ok(days * SECONDS_PER_DAY + date.seconds_of_day())
    }

    fn day_number(self, date: &CalendarDate) -> Result<i64, AxisError> {
        let year = i64::from(date.year);
        let month_idx = (date.month - 1) as usize;
        let day = i64::from(date.day) - 1;
        let n = match self {
            Calendar::Day360 => year * 360 + i64::from(date.month - 1) * 30 + day,
            Calendar::NoLeap => year * 365 + i64::from(CUM_NOLEAP[month_idx]) + day,
            Calendar::AllLeap => year * 366 + i64::from(CUM_LEAP[month_idx]) + day,
            Calendar::Julian => julian_to_jdn(date),
            Calendar::ProlepticGregorian => gregorian_to_jdn(date)?,
            Calendar::Standard if (date.year, date.month, date.day) >= (1582, 10, 15) => {
                gregorian_to_jdn(date)?
            }
            Calendar::Standard => julian_to_jdn(date),
        };
        Ok(n)
    }

    fn date_from_day_number(self, n: i64) -> Result<(i32, u32, u32), AxisError> {
        let fixed = |days_per_year: i64, cum: &[u32; 12]| -> Result<(i32, u32, u32), AxisError> {
            let year = i32::try_from(n.div_euclid(days_per_year))
                .map_err(|_| AxisError::InvalidDate(format!("day number {n} out of range")))?;
            let doy = n.rem_euclid(days_per_year) as u32;
            let month_idx = cum.iter().rposition(|&start| start <= doy).unwrap_or(0);
            Ok((year, month_idx as u32 + 1, doy - cum[month_idx] + 1))
        };
        match self {
            Calendar::Day360 => {
                let year = i32::try_from(n.div_euclid(360))
                    .map_err(|_| AxisError::InvalidDate(format!("day number {n} out of range")))?;
                let doy = n.rem_euclid(360) as u32;
                Ok((year, doy / 30 + 1, doy % 30 + 1))
            }
            Calendar::NoLeap => fixed(365, &CUM_NOLEAP),
            Calendar::AllLeap => fixed(366, &CUM_LEAP),
            Calendar::Julian => Ok(jdn_to_julian(n)),
            Calendar::ProlepticGregorian => jdn_to_gregorian(n),
            Calendar::Standard if n >= GREGORIAN_SWITCH_JDN => jdn_to_gregorian(n),
            Calendar::Standard => Ok(jdn_to_julian(n)),
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Calendar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

fn julian_leap(year: i32) -> bool {
    year.rem_euclid(4) == 0
}

fn gregorian_leap(year: i32) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

fn in_gregorian_gap(date: &CalendarDate) -> bool {
    date.year == 1582 && date.month == 10 && (5..=14).contains(&date.day)
}

fn overflow(date: &CalendarDate) -> AxisError {
    AxisError::InvalidDate(format!("arithmetic on {date} overflows"))
}

fn julian_to_jdn(date: &CalendarDate) -> i64 {
    let a = (14 - i64::from(date.month)) / 12;
    let y = i64::from(date.year) + 4800 - a;
    let m = i64::from(date.month) + 12 * a - 3;
    i64::from(date.day) + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - 32083
}

fn jdn_to_julian(jdn: i64) -> (i32, u32, u32) {
    let c = jdn + 32082;
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2) / 153;
    let day = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = d - 4800 + m / 10;
    (year as i32, month as u32, day as u32)
}

fn gregorian_to_jdn(date: &CalendarDate) -> Result<i64, AxisError> {
    let naive = NaiveDate::from_ymd_opt(date.year, date.month, date.day)
        .ok_or_else(|| AxisError::InvalidDate(format!("{date} is outside the supported range")))?;
    Ok(i64::from(naive.num_days_from_ce()) + CE_TO_JDN)
}

fn jdn_to_gregorian(jdn: i64) -> Result<(i32, u32, u32), AxisError> {
    i32::try_from(jdn - CE_TO_JDN)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map(|d| (d.year(), d.month(), d.day()))
        .ok_or_else(|| AxisError::InvalidDate(format!("day number {jdn} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Calendar::from_name("365_day").unwrap(), Calendar::NoLeap);
        assert_eq!(Calendar::from_name("Gregorian").unwrap(), Calendar::Standard);
        assert!(matches!(
            Calendar::from_name("none"),
            Err(AxisError::UnsupportedCalendar(_))
        ));
    }

    #[test]
    fn day_360_allows_february_30() {
        let d = CalendarDate::ymd(2000, 2, 30);
        assert!(Calendar::Day360.validate(&d).is_ok());
        assert!(Calendar::NoLeap.validate(&d).is_err());
        let next = Calendar::Day360.add(&d, 1, StepUnit::Days).unwrap();
        assert_eq!(next, CalendarDate::ymd(2000, 3, 1));
    }

    #[test]
    fn noleap_skips_february_29() {
        let d = CalendarDate::ymd(2000, 2, 28);
        let next = Calendar::NoLeap.add(&d, 1, StepUnit::Days).unwrap();
        assert_eq!(next, CalendarDate::ymd(2000, 3, 1));
        let next = Calendar::ProlepticGregorian.add(&d, 1, StepUnit::Days).unwrap();
        assert_eq!(next, CalendarDate::ymd(2000, 2, 29));
    }

    #[test]
    fn standard_calendar_jumps_the_1582_gap() {
        let d = CalendarDate::ymd(1582, 10, 4);
        let next = Calendar::Standard.add(&d, 1, StepUnit::Days).unwrap();
        assert_eq!(next, CalendarDate::ymd(1582, 10, 15));
        assert!(Calendar::Standard.validate(&CalendarDate::ymd(1582, 10, 10)).is_err());
        // 1500 is a leap year under the Julian rule used before the switch.
        assert_eq!(Calendar::Standard.days_in_month(1500, 2), 29);
        assert_eq!(Calendar::ProlepticGregorian.days_in_month(1500, 2), 28);
    }

    #[test]
    fn julian_day_numbers_round_trip() {
        for jdn in [0_i64, 1_721_424, 2_299_160, 2_451_545, 2_500_000] {
            let (y, m, d) = jdn_to_julian(jdn);
            assert_eq!(julian_to_jdn(&CalendarDate::ymd(y, m, d)), jdn);
        }
    }

    #[test]
    fn gregorian_day_number_matches_known_epoch() {
        // 2000-01-01 is JDN 2451545.
        let jdn = gregorian_to_jdn(&CalendarDate::ymd(2000, 1, 1)).unwrap();
        assert_eq!(jdn, 2_451_545);
        assert_eq!(jdn_to_gregorian(jdn).unwrap(), (2000, 1, 1));
    }

    #[test]
    fn month_steps_clamp_day() {
        let d = CalendarDate::ymd(2001, 1, 31);
        let next = Calendar::Standard.add(&d, 1, StepUnit::Months).unwrap();
        assert_eq!(next, CalendarDate::ymd(2001, 2, 28));
        let back = Calendar::Standard.add(&d, -13, StepUnit::Months).unwrap();
        assert_eq!(back, CalendarDate::ymd(1999, 12, 31));
    }

    #[test]
    fn seconds_between_spans_years() {
        let a = CalendarDate::ymd(2000, 1, 1);
        let b = CalendarDate::ymd(2001, 1, 1);
        assert_eq!(Calendar::NoLeap.seconds_between(&a, &b).unwrap(), 365 * 86_400);
        assert_eq!(Calendar::AllLeap.seconds_between(&a, &b).unwrap(), 366 * 86_400);
        assert_eq!(Calendar::Day360.seconds_between(&a, &b).unwrap(), 360 * 86_400);
        assert_eq!(Calendar::Standard.seconds_between(&a, &b).unwrap(), 366 * 86_400);
    }

    #[test]
    fn add_seconds_handles_negative_offsets() {
        let d = CalendarDate::ymd(2000, 1, 1);
        let prev = Calendar::NoLeap.add(&d, -90, StepUnit::Minutes).unwrap();
        assert_eq!(prev, CalendarDate::new(1999, 12, 31, 22, 30, 0));
    }
}
