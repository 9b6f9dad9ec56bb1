//! Command-line parsing for the CMIP5 time axis checker.
//!
//! Parsing stays here; `app` turns the parsed flags into a `BatchConfig`.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::domain::Mode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "time-axis",
    version,
    about = "Rebuild, check, and rewrite the time axis of CMIP5 files"
)]
pub struct Cli {
    /// Directory holding the files of one variable (all share frequency, calendar, and units).
    pub directory: PathBuf,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Print the frequency units and worker count, and log per-file details.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Number of worker threads.
    #[arg(long, env = "TIME_AXIS_THREADS", default_value_t = 4)]
    pub threads: usize,

    /// Regex the directory path must match before anything is read.
    #[arg(long, env = "TIME_AXIS_DRS_PATTERN")]
    pub drs_pattern: Option<String>,

    /// Write one CSV row per file.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Write the whole batch report as JSON.
    #[arg(long)]
    pub export_json: Option<PathBuf>,
}

/// Exactly one of check/write/force.
#[derive(Debug, Args, Clone, Copy)]
#[group(required = true, multiple = false)]
pub struct ModeArgs {
    /// Check the time axis and report; never modify files.
    #[arg(short = 'c', long)]
    pub check: bool,

    /// Rewrite the time axis (and bounds) of files where it is wrong.
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Rewrite the time axis of every processable file.
    #[arg(short = 'f', long)]
    pub force: bool,
}

impl ModeArgs {
    pub fn mode(self) -> Mode {
        if self.force {
            Mode::Force
        } else if self.write {
            Mode::Write
        } else {
            Mode::Check
        }
    }
}
