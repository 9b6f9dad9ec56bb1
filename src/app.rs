//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - runs the directory batch
//! - prints the report and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::BatchConfig;
use crate::error::AppError;

pub mod batch;
pub mod pipeline;

/// Entry point for the `time-axis` binary.
pub fn run() -> Result<(), AppError> {
    // Environment fallbacks for `--threads` / `--drs-pattern` may live in `.env`.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = batch_config_from_args(&cli);
    let report = batch::run_directory(&config)?;

    println!("{}", crate::report::format_batch_report(&report, config.verbose));

    if let Some(path) = &config.export_csv {
        crate::io::export::write_report_csv(path, &report)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_report_json(path, &report)?;
    }

    Ok(())
}

pub fn batch_config_from_args(cli: &Cli) -> BatchConfig {
    BatchConfig {
        directory: cli.directory.clone(),
        mode: cli.mode.mode(),
        threads: cli.threads,
        verbose: cli.verbose,
        drs_pattern: cli.drs_pattern.clone(),
        export_csv: cli.export.clone(),
        export_json: cli.export_json.clone(),
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`. Logs go to stderr.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
