//! Export batch outcomes to CSV or JSON.
//!
//! CSV has one row per file, suitable for spreadsheets. JSON carries the whole
//! batch, context included.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::BatchReport;
use crate::error::AppError;

const CSV_HEADER: &str =
    "file,start,end,steps,instant,last_date,last_computed,time_axis,time_bounds,action,error";

/// Write one CSV row per file, in batch order.
pub fn write_report_csv(path: &Path, report: &BatchReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(5, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{CSV_HEADER}").map_err(|e| AppError::new(5, format!("Failed to write export CSV header: {e}")))?;

    for entry in &report.entries {
        let row = match &entry.result {
            Ok(r) => format!(
                "{},{},{},{},{},{},{},{},{},{},{}",
                csv_field(&r.file),
                r.start,
                r.end,
                r.steps,
                r.instant,
                r.last_date.label(),
                r.last_computed,
                r.time_axis.label(),
                r.time_bounds.label(),
                r.action.label(),
                csv_field(r.ignore_reason.as_deref().unwrap_or("")),
            ),
            Err(e) => format!("{},,,,,,,,,,{}", csv_field(&entry.file), csv_field(&e.to_string())),
        };
        writeln!(out, "{row}").map_err(|e| AppError::new(5, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(5, format!("Failed to write export CSV '{}': {e}", path.display())))
}

/// Write the full batch report as pretty JSON.
pub fn write_report_json(path: &Path, report: &BatchReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(5, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut out, report)
        .map_err(|e| AppError::new(5, format!("Failed to write export JSON: {e}")))?;
    out.flush()
        .map_err(|e| AppError::new(5, format!("Failed to write export JSON '{}': {e}", path.display())))
}

/// Quote a field when it contains a separator, quote, or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
