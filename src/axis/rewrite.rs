//! Deciding whether a file is rewritten, and doing it.

use crate::axis::verify::Verification;
use crate::calendar::TimeUnits;
use crate::domain::{CanonicalAxis, Mode};
use crate::error::AxisError;
use crate::io::store::{Dataset, TIME, TIME_BOUNDS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Rewrite,
    /// Not processable; carries the reason shown in the report.
    Ignore(String),
}

/// Mode x verdicts.
///
/// A file failing the last-date check is ignored in every mode, `force`
/// included. `write` rewrites only when the time values or bounds differ.
pub fn decide(mode: Mode, verification: &Verification) -> Decision {
    if let Err(err) = verification.ensure_processable() {
        return Decision::Ignore(err.to_string());
    }
    match mode {
        Mode::Check => Decision::Keep,
        Mode::Write if verification.ensure_matching().is_err() => Decision::Rewrite,
        Mode::Write => Decision::Keep,
        Mode::Force => Decision::Rewrite,
    }
}

/// Overwrite `time`, its `units`, and `time_bnds` when the file has one, then flush.
pub fn commit<D: Dataset + ?Sized>(
    dataset: &mut D,
    axis: &CanonicalAxis,
    units: &TimeUnits,
) -> Result<(), AxisError> {
    dataset.write_values(TIME, &axis.values)?;
    dataset.write_attribute(TIME, "units", units.as_str())?;
    if dataset.has_variable(TIME_BOUNDS) {
        dataset.write_values(TIME_BOUNDS, &axis.flat_bounds())?;
    }
    dataset.flush()?;
    Ok(())
}
