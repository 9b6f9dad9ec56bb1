//! Comparison of a rebuilt axis with what a file actually stores.

use crate::calendar::CalendarDate;
use crate::domain::{CanonicalAxis, FileDescriptor, ProcessingContext, StoredAxis, Verdict};
use crate::error::AxisError;

/// Result of both checks on one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// Whether the last rebuilt timestep lands on the filename end date.
    pub last_date: Verdict,
    pub last_computed: CalendarDate,
    pub expected_end: CalendarDate,
    pub time: Verdict,
    pub bounds: Verdict,
}

impl Verification {
    /// Fails when the file is not processable (end date contradicts the axis).
    pub fn ensure_processable(&self) -> Result<(), AxisError> {
        match self.last_date {
            Verdict::Correct => Ok(()),
            _ => Err(AxisError::InconsistentEndDate {
                computed: self.last_computed,
                expected: self.expected_end,
            }),
        }
    }

    /// Fails when stored values or bounds differ from the rebuilt ones.
    pub fn ensure_matching(&self) -> Result<(), AxisError> {
        if self.time == Verdict::Mistaken {
            return Err(AxisError::AxisMismatch { what: "time values" });
        }
        if self.bounds == Verdict::Mistaken {
            return Err(AxisError::AxisMismatch { what: "time bounds" });
        }
        Ok(())
    }
}

/// Run the last-date check and the exact equality checks.
///
/// The last timestep is the lower edge of the final cell, decoded back to a
/// date in the batch calendar. A stored `units` string other than the batch
/// units counts as a time-axis mismatch even when the numbers agree.
pub fn verify(
    axis: &CanonicalAxis,
    stored: &StoredAxis,
    file: &FileDescriptor,
    ctx: &ProcessingContext,
) -> Result<Verification, AxisError> {
    let [last_lower, _] = *axis.bounds.last().ok_or(AxisError::EmptyAxis)?;
    let last_computed = ctx.units.decode(last_lower, ctx.calendar)?;

    let units_match = stored.units.trim() == ctx.units.as_str();
    let time = Verdict::from_match(units_match && stored.values == axis.values);

    let bounds = match &stored.bounds {
        Some(pairs) => Verdict::from_match(*pairs == axis.bounds),
        None => Verdict::NotApplicable,
    };

    Ok(Verification {
        last_date: Verdict::from_match(last_computed == file.end),
        last_computed,
        expected_end: file.end,
        time,
        bounds,
    })
}
