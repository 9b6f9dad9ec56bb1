//! In-memory datasets, a test fixture for the pipeline and batch driver.
//!
//! Handles share their document, so a write through one handle is visible to
//! the next `open`. Every successful write bumps a counter that tests use to
//! prove a file was (or was not) touched.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::io::store::{Access, Dataset, DatasetDoc, DatasetSource, StoreError};

#[derive(Debug, Clone)]
pub struct MemoryDataset {
    doc: Arc<Mutex<DatasetDoc>>,
    writes: Arc<AtomicUsize>,
    access: Access,
}

impl MemoryDataset {
    pub fn new(doc: DatasetDoc) -> Self {
        Self {
            doc: Arc::new(Mutex::new(doc)),
            writes: Arc::new(AtomicUsize::new(0)),
            access: Access::ReadWrite,
        }
    }

    /// Number of value/attribute writes made through any handle.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Result<DatasetDoc, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn handle(&self, access: Access) -> Self {
        Self {
            access,
            ..self.clone()
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DatasetDoc>, StoreError> {
        self.doc.lock().map_err(|_| StoreError::Poisoned)
    }

    fn write_with(&mut self, f: impl FnOnce(&mut DatasetDoc) -> Result<(), StoreError>) -> Result<(), StoreError> {
        if self.access == Access::ReadOnly {
            return Err(StoreError::ReadOnly);
        }
        let mut doc = self.lock()?;
        f(&mut doc)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Dataset for MemoryDataset {
    fn global_attribute(&self, name: &str) -> Option<String> {
        self.lock().ok()?.attributes.get(name).cloned()
    }

    fn has_variable(&self, name: &str) -> bool {
        self.lock().map(|doc| doc.variables.contains_key(name)).unwrap_or(false)
    }

    fn shape(&self, variable: &str) -> Result<Vec<usize>, StoreError> {
        Ok(self.lock()?.variable(variable)?.shape.clone())
    }

    fn read_values(&self, variable: &str) -> Result<Vec<f64>, StoreError> {
        Ok(self.lock()?.variable(variable)?.values.clone())
    }

    fn attribute(&self, variable: &str, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.variable(variable)?.attributes.get(name).cloned())
    }

    fn write_values(&mut self, variable: &str, values: &[f64]) -> Result<(), StoreError> {
        self.write_with(|doc| doc.write_values(variable, values))
    }

    fn write_attribute(&mut self, variable: &str, name: &str, value: &str) -> Result<(), StoreError> {
        self.write_with(|doc| doc.write_attribute(variable, name, value))
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A named collection of in-memory datasets.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: BTreeMap<String, MemoryDataset>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, doc: DatasetDoc) -> MemoryDataset {
        let dataset = MemoryDataset::new(doc);
        self.datasets.insert(name.to_string(), dataset.clone());
        dataset
    }

    pub fn get(&self, name: &str) -> Option<&MemoryDataset> {
        self.datasets.get(name)
    }

    /// Names in sorted order, as a directory listing would return them.
    pub fn names(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }
}

impl DatasetSource for MemorySource {
    type Handle = MemoryDataset;

    fn open(&self, name: &str, access: Access) -> Result<MemoryDataset, StoreError> {
        self.datasets
            .get(name)
            .map(|ds| ds.handle(access))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::{TIME, Variable};

    #[test]
    fn handles_share_content_and_count_writes() {
        let mut source = MemorySource::new();
        let original = source.insert("a.nc", DatasetDoc::default().with_variable(TIME, Variable::new(vec![1], vec![0.0])));

        let mut rw = source.open("a.nc", Access::ReadWrite).unwrap();
        rw.write_values(TIME, &[5.0]).unwrap();

        let ro = source.open("a.nc", Access::ReadOnly).unwrap();
        assert_eq!(ro.read_values(TIME).unwrap(), vec![5.0]);
        assert_eq!(original.write_count(), 1);
    }

    #[test]
    fn read_only_handle_does_not_count() {
        let mut source = MemorySource::new();
        let original = source.insert("a.nc", DatasetDoc::default().with_variable(TIME, Variable::new(vec![1], vec![0.0])));
        let mut ro = source.open("a.nc", Access::ReadOnly).unwrap();
        assert!(matches!(ro.write_values(TIME, &[1.0]), Err(StoreError::ReadOnly)));
        assert_eq!(original.write_count(), 0);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let source = MemorySource::new();
        assert!(matches!(source.open("x.nc", Access::ReadOnly), Err(StoreError::NotFound(_))));
    }
}
