//! Directory driver: bootstrap the batch context, then fan the per-file
//! pipeline out over a bounded worker pool.

use std::path::Path;

use rayon::prelude::*;

use crate::app::pipeline::{bootstrap_context, process_named};
use crate::domain::{BatchConfig, BatchEntry, BatchReport, Mode, ProcessingContext};
use crate::drs::{DirectoryPattern, DrsName, list_files};
use crate::error::AppError;
use crate::io::json::JsonDirectory;
use crate::io::store::{Access, DatasetSource};

/// Build the context from the first file (in listing order) whose name
/// follows the DRS grammar. Runs before any worker starts.
pub fn bootstrap<S: DatasetSource + ?Sized>(
    source: &S,
    files: &[String],
    mode: Mode,
) -> Result<ProcessingContext, AppError> {
    let first = files
        .iter()
        .find(|f| DrsName::parse(f).is_ok())
        .ok_or_else(|| AppError::new(3, "No file follows the CMIP5 DRS file naming."))?;

    let dataset = source
        .open(first, Access::ReadOnly)
        .map_err(|e| AppError::new(3, format!("Failed to open {first}: {e}")))?;
    let ctx = bootstrap_context(&dataset, mode).map_err(|e| {
        let err = AppError::from(e);
        AppError::new(err.exit_code(), format!("{first}: {err}"))
    })?;

    tracing::info!(
        "batch context from {first}: frequency={} realm={} calendar={} units='{}'",
        ctx.frequency,
        ctx.realm,
        ctx.calendar,
        ctx.units.as_str()
    );
    Ok(ctx)
}

/// Process every file on a pool of `threads` workers.
///
/// Entries come back in the order of `files`; a failing file never stops the others.
pub fn run_files<S: DatasetSource + ?Sized>(
    source: &S,
    files: &[String],
    ctx: &ProcessingContext,
    threads: usize,
) -> Result<Vec<BatchEntry>, AppError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| AppError::new(2, format!("Failed to start worker pool: {e}")))?;

    let entries: Vec<BatchEntry> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let result = process_named(source, file, ctx);
                if let Err(err) = &result {
                    tracing::warn!("{file}: {err}");
                }
                BatchEntry {
                    file: file.clone(),
                    result,
                }
            })
            .collect()
    });
    Ok(entries)
}

/// Bootstrap and run one batch over `files` taken from `source`.
pub fn run_batch<S: DatasetSource + ?Sized>(
    source: &S,
    directory: &Path,
    files: &[String],
    mode: Mode,
    threads: usize,
) -> Result<BatchReport, AppError> {
    let context = bootstrap(source, files, mode)?;
    let entries = run_files(source, files, &context, threads)?;
    Ok(BatchReport {
        directory: directory.to_path_buf(),
        context,
        threads,
        entries,
    })
}

/// Check, list, and process one directory of JSON datasets.
pub fn run_directory(config: &BatchConfig) -> Result<BatchReport, AppError> {
    if let Some(pattern) = &config.drs_pattern {
        DirectoryPattern::new(pattern)?.check(&config.directory)?;
    }

    let files = list_files(&config.directory)?;
    if files.is_empty() {
        return Err(AppError::new(
            3,
            format!("No files found in {}", config.directory.display()),
        ));
    }
    tracing::debug!("{} files to process in {}", files.len(), config.directory.display());

    let source = JsonDirectory::new(&config.directory);
    run_batch(&source, &config.directory, &files, config.mode, config.threads)
}
