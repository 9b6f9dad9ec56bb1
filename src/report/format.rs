//! Console layout of a batch report.
//!
//! A tree, one branch per file, labels left-aligned in a 40-column gutter and
//! values right-aligned to column 100.

use crate::domain::{Action, BatchEntry, BatchReport, OutcomeReport, Verdict};

const LABEL_WIDTH: usize = 40;
const VALUE_WIDTH: usize = 60;

/// Format the whole batch: directory header, then every file in listing order.
pub fn format_batch_report(report: &BatchReport, verbose: bool) -> String {
    let mut out = String::new();
    let ctx = &report.context;

    out.push_str(&line(" DIRECTORY:", &report.directory.display().to_string()));
    out.push_str("   |\n");
    out.push_str(&line("   |--> Frequency:", ctx.frequency.code()));
    out.push_str(&line("   |--> Calendar:", ctx.calendar.name()));
    out.push_str(&line("   |--> Time units:", ctx.units.as_str()));
    if verbose {
        out.push_str(&line("   |--> Frequency units:", &ctx.frequency_units));
        out.push_str(&line("   |--> Workers:", &report.threads.to_string()));
    }

    for entry in &report.entries {
        out.push_str("   |\n");
        out.push_str(&format_entry(entry));
    }

    out.push('\n');
    out.push_str(&format_summary(report));
    out
}

fn format_entry(entry: &BatchEntry) -> String {
    let mut out = line("   |--> File:", &entry.file);
    match &entry.result {
        Ok(r) => out.push_str(&format_outcome(r)),
        Err(e) => out.push_str(&line("   |     |--> Error:", &e.to_string())),
    }
    out
}

fn format_outcome(r: &OutcomeReport) -> String {
    let mut out = String::new();
    out.push_str(&line("   |     |--> Start:", &r.start.to_report_string()));
    out.push_str(&line("   |     |--> End:", &r.end.to_report_string()));
    out.push_str(&line("   |     |--> Timesteps:", &r.steps.to_string()));
    out.push_str(&line("   |     |--> Instant time:", if r.instant { "True" } else { "False" }));

    let last_date = match (&r.last_date, &r.ignore_reason) {
        (Verdict::Mistaken, Some(reason)) => format!("Mistaken ({reason})"),
        (v, _) => v.label().to_string(),
    };
    out.push_str(&line("   |     |--> Last date checking:", &last_date));
    out.push_str(&line("   |     |--> Time axis checking:", r.time_axis.label()));
    out.push_str(&line("   |     |--> Time boundaries checking:", r.time_bounds.label()));
    out.push_str(&line("   |     |--> Action:", r.action.label()));
    out
}

fn format_summary(report: &BatchReport) -> String {
    format!(
        "{} files: {} untouched, {} rewritten, {} ignored, {} failed\n",
        report.entries.len(),
        report.count_action(Action::Untouched),
        report.count_action(Action::Rewritten),
        report.count_action(Action::Ignored),
        report.error_count(),
    )
}

fn line(label: &str, value: &str) -> String {
    format!("{label:<lw$}{value:>vw$}\n", lw = LABEL_WIDTH, vw = VALUE_WIDTH)
}
