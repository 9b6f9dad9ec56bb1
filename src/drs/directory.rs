//! Directory-level checks and enumeration.

use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::AppError;

/// Pattern a batch directory must follow (e.g. a DRS path down to the variable).
#[derive(Debug, Clone)]
pub struct DirectoryPattern {
    regex: Regex,
}

impl DirectoryPattern {
    pub fn new(pattern: &str) -> Result<Self, AppError> {
        let regex = Regex::new(pattern)
            .map_err(|e| AppError::new(2, format!("Invalid directory pattern '{pattern}': {e}")))?;
        Ok(Self { regex })
    }

    /// Fails when `directory` does not match.
    pub fn check(&self, directory: &Path) -> Result<(), AppError> {
        let text = directory.to_string_lossy();
        if self.regex.is_match(&text) {
            Ok(())
        } else {
            Err(AppError::new(
                2,
                format!("{} does not follow CMIP5 DRS (pattern: {}).", text, self.regex.as_str()),
            ))
        }
    }
}

/// Sorted names of the regular files directly inside `directory`.
///
/// Hidden files (leading `.`) are skipped.
pub fn list_files(directory: &Path) -> Result<Vec<String>, AppError> {
    if !directory.is_dir() {
        return Err(AppError::new(2, format!("Not a directory: {}", directory.display())));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            AppError::new(2, format!("Failed to read directory '{}': {e}", directory.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        files.push(name);
    }

    tracing::debug!("{} files listed in {}", files.len(), directory.display());
    Ok(files)
}
