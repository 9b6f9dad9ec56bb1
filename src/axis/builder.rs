//! Canonical time axis construction.
//!
//! Every cell edge is computed as `start + t * increment` directly from the
//! start date, never by accumulating the previous edge, and converted to the
//! numeric file units once.

use crate::calendar::{Calendar, CalendarDate, TimeUnits};
use crate::domain::{CanonicalAxis, Frequency};
use crate::error::AxisError;

/// Build the `steps`-long axis starting at `start`.
///
/// Cell `t` spans `[start + t*inc, start + (t+1)*inc]`. The axis value is the
/// upper edge for instantaneous fields and the midpoint otherwise.
pub fn build_axis(
    start: &CalendarDate,
    steps: usize,
    frequency: Frequency,
    units: &TimeUnits,
    calendar: Calendar,
    instant: bool,
) -> Result<CanonicalAxis, AxisError> {
    if steps == 0 {
        return Err(AxisError::EmptyAxis);
    }
    let (increment, step_unit) = frequency.increment();

    let edges = (0..=steps as i64)
        .map(|t| {
            let date = calendar.add(start, t * increment, step_unit)?;
            units.encode(&date, calendar)
        })
        .collect::<Result<Vec<f64>, AxisError>>()?;

    let bounds: Vec<[f64; 2]> = edges.windows(2).map(|w| [w[0], w[1]]).collect();
    let values = bounds
        .iter()
        .map(|&[lo, hi]| if instant { hi } else { (lo + hi) / 2.0 })
        .collect();

    Ok(CanonicalAxis { values, bounds })
}
