//! Datasets stored as JSON documents on disk.
//!
//! One file holds one `DatasetDoc`. Writes stay in memory until `flush`, which
//! writes a hidden sibling file and renames it over the original, so a failed
//! flush leaves the previous content intact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::io::store::{Access, Dataset, DatasetDoc, DatasetSource, StoreError};

/// An open JSON dataset.
#[derive(Debug)]
pub struct JsonDataset {
    path: PathBuf,
    doc: DatasetDoc,
    access: Access,
    dirty: bool,
}

impl JsonDataset {
    pub fn open(path: &Path, access: Access) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(|source| io_error(path, source))?;
        let doc: DatasetDoc = serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            access,
            dirty: false,
        })
    }

    /// Write `doc` to `path`, replacing any existing file.
    pub fn create(path: &Path, doc: &DatasetDoc) -> Result<(), StoreError> {
        write_atomically(path, doc)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_writable(&self) -> Result<(), StoreError> {
        match self.access {
            Access::ReadWrite => Ok(()),
            Access::ReadOnly => Err(StoreError::ReadOnly),
        }
    }
}

impl Dataset for JsonDataset {
    fn global_attribute(&self, name: &str) -> Option<String> {
        self.doc.attributes.get(name).cloned()
    }

    fn has_variable(&self, name: &str) -> bool {
        self.doc.variables.contains_key(name)
    }

    fn shape(&self, variable: &str) -> Result<Vec<usize>, StoreError> {
        Ok(self.doc.variable(variable)?.shape.clone())
    }

    fn read_values(&self, variable: &str) -> Result<Vec<f64>, StoreError> {
        let var = self.doc.variable(variable)?;
        if var.values.len() != var.element_count() {
            return Err(StoreError::ShapeMismatch {
                variable: variable.to_string(),
                expected: var.element_count(),
                found: var.values.len(),
            });
        }
        Ok(var.values.clone())
    }

    fn attribute(&self, variable: &str, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.doc.variable(variable)?.attributes.get(name).cloned())
    }

    fn write_values(&mut self, variable: &str, values: &[f64]) -> Result<(), StoreError> {
        self.ensure_writable()?;
        self.doc.write_values(variable, values)?;
        self.dirty = true;
        Ok(())
    }

    fn write_attribute(&mut self, variable: &str, name: &str, value: &str) -> Result<(), StoreError> {
        self.ensure_writable()?;
        self.doc.write_attribute(variable, name, value)?;
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        write_atomically(&self.path, &self.doc)?;
        self.dirty = false;
        tracing::debug!("flushed {}", self.path.display());
        Ok(())
    }
}

/// All datasets of one directory, addressed by file name.
#[derive(Debug, Clone)]
pub struct JsonDirectory {
    root: PathBuf,
}

impl JsonDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DatasetSource for JsonDirectory {
    type Handle = JsonDataset;

    fn open(&self, name: &str, access: Access) -> Result<JsonDataset, StoreError> {
        JsonDataset::open(&self.root.join(name), access)
    }
}

fn write_atomically(path: &Path, doc: &DatasetDoc) -> Result<(), StoreError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    let file = File::create(&tmp).map_err(|source| io_error(&tmp, source))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc).map_err(|source| StoreError::Format {
        path: tmp.clone(),
        source,
    })?;
    writer.flush().map_err(|source| io_error(&tmp, source))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|source| io_error(&tmp, source))?;
    drop(writer);

    fs::rename(&tmp, path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
