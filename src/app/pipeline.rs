//! Per-file pipeline shared by the serial and pooled drivers.
//!
//! decode name -> open -> read stored axis -> check context -> rebuild -> verify -> decide -> (commit)
//!
//! Everything up to the decision is a pure function of the file name, the
//! stored axis, and the batch context (`evaluate`). The only side effect is
//! the commit in `process_file`.

use crate::axis::{Decision, Verification, build_axis, commit, decide, verify};
use crate::calendar::{Calendar, TimeUnits};
use crate::domain::{
    Action, CanonicalAxis, FileDescriptor, Frequency, Mode, OutcomeReport, ProcessingContext, StoredAxis,
};
use crate::drs::{DrsName, is_instant_file};
use crate::error::AxisError;
use crate::io::store::{Access, Dataset, DatasetSource, TIME, TIME_BOUNDS};

/// Establish the batch context from one file's metadata.
///
/// Nothing is guessed: a missing `frequency`, `modeling_realm`, `time.units`,
/// or `time.calendar` is an error, and so is a units epoch that does not
/// exist in the calendar.
pub fn bootstrap_context<D: Dataset + ?Sized>(dataset: &D, mode: Mode) -> Result<ProcessingContext, AxisError> {
    let frequency = Frequency::from_code(&required_global(dataset, "frequency")?)?;
    let realm = required_global(dataset, "modeling_realm")?;
    let units = TimeUnits::parse(&required_time_attribute(dataset, "units")?)?;
    let calendar = Calendar::from_name(&required_time_attribute(dataset, "calendar")?)?;
    calendar
        .validate(&units.epoch)
        .map_err(|_| AxisError::InvalidUnits(format!("{} (epoch not in the {calendar} calendar)", units.as_str())))?;

    let (_, step_unit) = frequency.increment();
    let frequency_units = units.with_step_unit(step_unit);

    Ok(ProcessingContext {
        frequency,
        realm,
        calendar,
        units,
        frequency_units,
        mode,
    })
}

/// Read `time` (values, units, calendar) and `time_bnds` when present.
pub fn read_stored_axis<D: Dataset + ?Sized>(dataset: &D) -> Result<StoredAxis, AxisError> {
    let values = dataset.read_values(TIME)?;
    let units = required_time_attribute(dataset, "units")?;
    let calendar = required_time_attribute(dataset, "calendar")?;
    let bounds = if dataset.has_variable(TIME_BOUNDS) {
        Some(dataset.read_pairs(TIME_BOUNDS)?)
    } else {
        None
    };
    Ok(StoredAxis {
        values,
        units,
        calendar,
        bounds,
    })
}

/// Reject a file whose calendar or frequency differs from the batch.
pub fn check_context(stored: &StoredAxis, frequency: &str, ctx: &ProcessingContext) -> Result<(), AxisError> {
    let calendar = Calendar::from_name(&stored.calendar)?;
    if calendar != ctx.calendar {
        return Err(AxisError::ContextMismatch {
            attribute: "calendar",
            expected: ctx.calendar.to_string(),
            found: stored.calendar.clone(),
        });
    }
    let frequency = Frequency::from_code(frequency)?;
    if frequency != ctx.frequency {
        return Err(AxisError::ContextMismatch {
            attribute: "frequency",
            expected: ctx.frequency.to_string(),
            found: frequency.to_string(),
        });
    }
    Ok(())
}

/// Decode the period of a file and classify its sampling.
pub fn describe(
    file_name: &str,
    name: &DrsName,
    steps: usize,
    ctx: &ProcessingContext,
) -> Result<FileDescriptor, AxisError> {
    let (start, end) = name.period()?;
    ctx.calendar.validate(&start)?;
    ctx.calendar.validate(&end)?;
    Ok(FileDescriptor {
        name: file_name.to_string(),
        start,
        end,
        steps,
        instant: is_instant_file(name, &ctx.realm),
    })
}

/// Everything known about a file before anything is written.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub descriptor: FileDescriptor,
    pub axis: CanonicalAxis,
    pub verification: Verification,
    pub decision: Decision,
}

impl Evaluation {
    pub fn report(&self, action: Action) -> OutcomeReport {
        let d = &self.descriptor;
        let v = &self.verification;
        OutcomeReport {
            file: d.name.clone(),
            start: d.start,
            end: d.end,
            steps: d.steps,
            instant: d.instant,
            last_date: v.last_date,
            last_computed: v.last_computed,
            ignore_reason: match &self.decision {
                Decision::Ignore(reason) => Some(reason.clone()),
                _ => None,
            },
            time_axis: v.time,
            time_bounds: v.bounds,
            action,
        }
    }
}

/// Rebuild, verify, and decide. No I/O.
pub fn evaluate(
    file_name: &str,
    name: &DrsName,
    stored: &StoredAxis,
    ctx: &ProcessingContext,
) -> Result<Evaluation, AxisError> {
    let descriptor = describe(file_name, name, stored.values.len(), ctx)?;
    let axis = build_axis(
        &descriptor.start,
        descriptor.steps,
        ctx.frequency,
        &ctx.units,
        ctx.calendar,
        descriptor.instant,
    )?;
    let verification = verify(&axis, stored, &descriptor, ctx)?;
    let decision = decide(ctx.mode, &verification);
    Ok(Evaluation {
        descriptor,
        axis,
        verification,
        decision,
    })
}

/// Run the whole pipeline on an open dataset, committing when the decision says so.
pub fn process_file<D: Dataset + ?Sized>(
    file_name: &str,
    name: &DrsName,
    dataset: &mut D,
    ctx: &ProcessingContext,
) -> Result<OutcomeReport, AxisError> {
    let stored = read_stored_axis(dataset)?;
    let frequency = required_global(dataset, "frequency")?;
    check_context(&stored, &frequency, ctx)?;

    let evaluation = evaluate(file_name, name, &stored, ctx)?;
    let action = match &evaluation.decision {
        Decision::Keep => Action::Untouched,
        Decision::Rewrite => {
            commit(dataset, &evaluation.axis, &ctx.units)?;
            tracing::info!("{file_name}: time axis rewritten ({} steps)", evaluation.axis.len());
            Action::Rewritten
        }
        Decision::Ignore(reason) => {
            tracing::warn!("{file_name}: skipped, {reason}");
            Action::Ignored
        }
    };
    tracing::debug!(
        "{file_name}: time axis {}, bounds {}",
        evaluation.verification.time.label(),
        evaluation.verification.bounds.label()
    );
    Ok(evaluation.report(action))
}

/// Decode `file_name`, open it from `source`, and process it.
///
/// The name is decoded before anything is opened, and the dataset is only
/// opened for writing when the mode can mutate.
pub fn process_named<S: DatasetSource + ?Sized>(
    source: &S,
    file_name: &str,
    ctx: &ProcessingContext,
) -> Result<OutcomeReport, AxisError> {
    let name = DrsName::parse(file_name)?;
    name.precision()?;

    let access = if ctx.mode.mutates() { Access::ReadWrite } else { Access::ReadOnly };
    let mut dataset = source.open(file_name, access)?;
    process_file(file_name, &name, &mut dataset, ctx)
}

fn required_global<D: Dataset + ?Sized>(dataset: &D, name: &str) -> Result<String, AxisError> {
    dataset
        .global_attribute(name)
        .ok_or_else(|| AxisError::MissingMetadata(format!("global attribute '{name}'")))
}

fn required_time_attribute<D: Dataset + ?Sized>(dataset: &D, name: &str) -> Result<String, AxisError> {
    dataset
        .attribute(TIME, name)?
        .ok_or_else(|| AxisError::MissingMetadata(format!("{TIME}:{name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarDate;
    use crate::domain::Verdict;
    use crate::io::memory::{MemoryDataset, MemorySource};
    use crate::io::store::{DatasetDoc, Variable};

    const UNITS: &str = "days since 2000-01-01 00:00:00";

    fn daily_doc(values: Vec<f64>, bounds: Option<Vec<f64>>) -> DatasetDoc {
        let n = values.len();
        let mut doc = DatasetDoc::default()
            .with_attribute("frequency", "day")
            .with_attribute("modeling_realm", "atmos")
            .with_variable(
                TIME,
                Variable::new(vec![n], values)
                    .with_attribute("units", UNITS)
                    .with_attribute("calendar", "365_day"),
            );
        if let Some(b) = bounds {
            doc = doc.with_variable(TIME_BOUNDS, Variable::new(vec![n, 2], b));
        }
        doc
    }

    fn correct_daily(n: usize) -> (Vec<f64>, Vec<f64>) {
        let values = (0..n).map(|i| i as f64 + 0.5).collect();
        let bounds = (0..n).flat_map(|i| [i as f64, i as f64 + 1.0]).collect();
        (values, bounds)
    }

    fn context(mode: Mode) -> ProcessingContext {
        bootstrap_context(&MemoryDataset::new(daily_doc(vec![0.5], None)), mode).unwrap()
    }

    #[test]
    fn bootstrap_reads_file_metadata() {
        let ctx = context(Mode::Check);
        assert_eq!(ctx.frequency, Frequency::Daily);
        assert_eq!(ctx.realm, "atmos");
        assert_eq!(ctx.calendar, Calendar::NoLeap);
        assert_eq!(ctx.units.as_str(), UNITS);
        assert_eq!(ctx.frequency_units, "days since 2000-01-01 00:00:00");
    }

    #[test]
    fn bootstrap_refuses_missing_or_unknown_metadata() {
        let mut doc = daily_doc(vec![0.5], None);
        doc.attributes.remove("frequency");
        assert!(matches!(
            bootstrap_context(&MemoryDataset::new(doc), Mode::Check),
            Err(AxisError::MissingMetadata(_))
        ));

        let doc = daily_doc(vec![0.5], None).with_attribute("frequency", "fx");
        assert!(matches!(
            bootstrap_context(&MemoryDataset::new(doc), Mode::Check),
            Err(AxisError::UnsupportedFrequency(_))
        ));

        let mut doc = daily_doc(vec![0.5], None);
        doc.write_attribute(TIME, "calendar", "none").unwrap();
        assert!(matches!(
            bootstrap_context(&MemoryDataset::new(doc), Mode::Check),
            Err(AxisError::UnsupportedCalendar(_))
        ));
    }

    #[test]
    fn bootstrap_refuses_epoch_missing_from_calendar() {
        let mut doc = daily_doc(vec![0.5], None);
        doc.write_attribute(TIME, "units", "days since 2001-02-30").unwrap();
        let err = bootstrap_context(&MemoryDataset::new(doc), Mode::Check).unwrap_err();
        assert!(matches!(err, AxisError::InvalidUnits(_)));
        assert_eq!(crate::error::AppError::from(err).exit_code(), 4);

        let mut doc = daily_doc(vec![0.5], None);
        doc.write_attribute(TIME, "units", "days since 2000-02-30").unwrap();
        doc.write_attribute(TIME, "calendar", "360_day").unwrap();
        assert!(bootstrap_context(&MemoryDataset::new(doc), Mode::Check).is_ok());
    }

    #[test]
    fn daily_averaged_file_passes_every_check() {
        let (values, bounds) = correct_daily(31);
        let file = "pr_day_MODEL_amip_r1i1p1_20000101-20000131.nc";
        let name = DrsName::parse(file).unwrap();
        let stored = read_stored_axis(&MemoryDataset::new(daily_doc(values, Some(bounds)))).unwrap();

        let eval = evaluate(file, &name, &stored, &context(Mode::Check)).unwrap();
        assert!(!eval.descriptor.instant);
        assert_eq!(eval.axis.values[0], (eval.axis.bounds[0][0] + eval.axis.bounds[0][1]) / 2.0);
        assert_eq!(eval.verification.last_computed, CalendarDate::ymd(2000, 1, 31));

        let report = eval.report(Action::Untouched);
        assert_eq!(report.last_date, Verdict::Correct);
        assert_eq!(report.time_axis, Verdict::Correct);
        assert_eq!(report.time_bounds, Verdict::Correct);
        assert_eq!(report.ignore_reason, None);
    }

    #[test]
    fn three_hourly_temperature_is_instantaneous() {
        let mut doc = daily_doc(vec![0.0; 248], None).with_attribute("frequency", "3hr");
        doc.write_attribute(TIME, "units", "hours since 2000-01-01 00:00:00").unwrap();
        let dataset = MemoryDataset::new(doc);
        let ctx = bootstrap_context(&dataset, Mode::Check).unwrap();

        let file = "tas_3hr_MODEL_amip_r1i1p1_200001010130-200001312230.nc";
        let name = DrsName::parse(file).unwrap();
        let stored = read_stored_axis(&dataset).unwrap();
        let eval = evaluate(file, &name, &stored, &ctx).unwrap();

        assert!(eval.descriptor.instant);
        assert_eq!(eval.axis.values[0], eval.axis.bounds[0][1]);
        assert_eq!(eval.axis.values[0], 4.5);
        assert_eq!(eval.verification.last_date, Verdict::Correct);
        assert_eq!(eval.verification.time, Verdict::Mistaken);
        assert_eq!(eval.verification.bounds, Verdict::NotApplicable);
    }

    #[test]
    fn write_mode_rewrites_a_shifted_axis() {
        let (values, bounds) = correct_daily(31);
        let shifted: Vec<f64> = values.iter().map(|v| v + 1.0).collect();
        let mut source = MemorySource::new();
        let file = "pr_day_MODEL_amip_r1i1p1_20000101-20000131.nc";
        let dataset = source.insert(file, daily_doc(shifted, Some(bounds)));

        let report = process_named(&source, file, &context(Mode::Write)).unwrap();
        assert_eq!(report.time_axis, Verdict::Mistaken);
        assert_eq!(report.action, Action::Rewritten);
        assert_eq!(dataset.snapshot().unwrap().variables[TIME].values, values);
    }

    #[test]
    fn write_mode_normalizes_divergent_units() {
        let (values, _) = correct_daily(31);
        let mut doc = daily_doc(values.iter().map(|v| v + 365.0).collect(), None);
        doc.write_attribute(TIME, "units", "days since 1999-01-01 00:00:00").unwrap();
        let mut source = MemorySource::new();
        let file = "pr_day_MODEL_amip_r1i1p1_20000101-20000131.nc";
        let dataset = source.insert(file, doc);

        let report = process_named(&source, file, &context(Mode::Write)).unwrap();
        assert_eq!(report.action, Action::Rewritten);
        let doc = dataset.snapshot().unwrap();
        assert_eq!(doc.variables[TIME].attributes["units"], UNITS);
        assert_eq!(doc.variables[TIME].values, values);
    }

    #[test]
    fn check_mode_opens_read_only() {
        let (values, _) = correct_daily(31);
        let mut source = MemorySource::new();
        let file = "pr_day_MODEL_amip_r1i1p1_20000101-20000131.nc";
        let dataset = source.insert(file, daily_doc(values.iter().map(|v| v * 2.0).collect(), None));

        let report = process_named(&source, file, &context(Mode::Check)).unwrap();
        assert_eq!(report.time_axis, Verdict::Mistaken);
        assert_eq!(report.action, Action::Untouched);
        assert_eq!(dataset.write_count(), 0);
    }

    #[test]
    fn calendar_divergence_is_a_context_mismatch() {
        let (values, _) = correct_daily(31);
        let mut doc = daily_doc(values, None);
        doc.write_attribute(TIME, "calendar", "360_day").unwrap();
        let mut source = MemorySource::new();
        let file = "pr_day_MODEL_amip_r1i1p1_20000101-20000131.nc";
        let dataset = source.insert(file, doc);

        let err = process_named(&source, file, &context(Mode::Force)).unwrap_err();
        assert!(matches!(err, AxisError::ContextMismatch { attribute: "calendar", .. }));
        assert_eq!(dataset.write_count(), 0);
    }

    #[test]
    fn frequency_divergence_is_a_context_mismatch() {
        let (values, _) = correct_daily(31);
        let doc = daily_doc(values, None).with_attribute("frequency", "mon");
        let mut source = MemorySource::new();
        let file = "pr_day_MODEL_amip_r1i1p1_20000101-20000131.nc";
        source.insert(file, doc);

        let err = process_named(&source, file, &context(Mode::Check)).unwrap_err();
        assert!(matches!(err, AxisError::ContextMismatch { attribute: "frequency", .. }));
    }

    #[test]
    fn bad_names_fail_before_opening() {
        let source = MemorySource::new();
        let ctx = context(Mode::Check);
        assert!(matches!(
            process_named(&source, "pr_day_MODEL_amip_r1i1p1.nc", &ctx),
            Err(AxisError::InvalidName(_))
        ));
        assert!(matches!(
            process_named(&source, "pr_day_MODEL_amip_r1i1p1_200001-20000131.nc", &ctx),
            Err(AxisError::InvalidPrecision { .. })
        ));
    }

    #[test]
    fn filename_date_missing_from_calendar_is_invalid() {
        let (values, _) = correct_daily(3);
        let file = "pr_day_MODEL_amip_r1i1p1_20010227-20010229.nc";
        let name = DrsName::parse(file).unwrap();
        let stored = read_stored_axis(&MemoryDataset::new(daily_doc(values, None))).unwrap();
        assert!(matches!(
            evaluate(file, &name, &stored, &context(Mode::Check)),
            Err(AxisError::InvalidDate(_))
        ));
    }

    #[test]
    fn empty_time_variable_is_rejected() {
        let file = "pr_day_MODEL_amip_r1i1p1_20000101-20000131.nc";
        let name = DrsName::parse(file).unwrap();
        let stored = read_stored_axis(&MemoryDataset::new(daily_doc(Vec::new(), None))).unwrap();
        assert!(matches!(
            evaluate(file, &name, &stored, &context(Mode::Check)),
            Err(AxisError::EmptyAxis)
        ));
    }

    fn doc(frequency: &str, realm: &str, units: &str, calendar: &str, n: usize) -> DatasetDoc {
        DatasetDoc::default()
            .with_attribute("frequency", frequency)
            .with_attribute("modeling_realm", realm)
            .with_variable(
                TIME,
                Variable::new(vec![n], vec![0.0; n])
                    .with_attribute("units", units)
                    .with_attribute("calendar", calendar),
            )
    }

    fn last_date_of(file: &str, doc: DatasetDoc) -> (Verdict, CalendarDate) {
        let dataset = MemoryDataset::new(doc);
        let ctx = bootstrap_context(&dataset, Mode::Check).unwrap();
        let name = DrsName::parse(file).unwrap();
        let stored = read_stored_axis(&dataset).unwrap();
        let eval = evaluate(file, &name, &stored, &ctx).unwrap();
        (eval.verification.last_date, eval.verification.last_computed)
    }

    #[test]
    fn monthly_last_date_lands_on_the_end_month() {
        let file = "tos_Omon_MODEL_historical_r1i1p1_185001-200512.nc";
        let (verdict, last) = last_date_of(file, doc("mon", "ocean", "days since 1850-01-01", "standard", 1872));
        assert_eq!(verdict, Verdict::Correct);
        assert_eq!(last, CalendarDate::ymd(2005, 12, 1));

        let (verdict, last) = last_date_of(file, doc("mon", "ocean", "days since 1850-01-01", "standard", 1871));
        assert_eq!(verdict, Verdict::Mistaken);
        assert_eq!(last, CalendarDate::ymd(2005, 11, 1));
    }

    #[test]
    fn yearly_last_date_lands_on_the_end_year() {
        let file = "tas_yr_MODEL_historical_r1i1p1_1850-1859.nc";
        let (verdict, last) = last_date_of(file, doc("yr", "atmos", "days since 1850-01-01", "360_day", 10));
        assert_eq!(verdict, Verdict::Correct);
        assert_eq!(last, CalendarDate::ymd(1859, 1, 1));

        let (verdict, _) = last_date_of(file, doc("yr", "atmos", "days since 1850-01-01", "360_day", 11));
        assert_eq!(verdict, Verdict::Mistaken);
    }

    #[test]
    fn subhourly_last_date_lands_on_the_end_second() {
        let file = "tas_subhr_MODEL_amip_r1i1p1_20000101000000-20000101233000.nc";
        let (verdict, last) = last_date_of(file, doc("subhr", "atmos", "days since 2000-01-01", "gregorian", 48));
        assert_eq!(verdict, Verdict::Correct);
        assert_eq!(last, CalendarDate::new(2000, 1, 1, 23, 30, 0));
    }
}
