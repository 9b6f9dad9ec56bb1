//! Storage seam: a dataset is a set of named numeric arrays plus string
//! attributes, at both global and variable level.
//!
//! The pipeline only ever talks to `Dataset` and `DatasetSource`; concrete
//! backends live in `io::json` (files on disk) and `io::memory` (tests).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the time coordinate variable.
pub const TIME: &str = "time";
/// Name of the time bounds variable, shape `(N, 2)`.
pub const TIME_BOUNDS: &str = "time_bnds";

/// Storage errors. Any of these ends processing of the file involved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Variable not found: {0}")]
    MissingVariable(String),

    /// Values written (or stored) do not fit the variable's shape.
    #[error("Shape mismatch on {variable}: expected {expected} values, got {found}")]
    ShapeMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },

    #[error("Dataset was opened read-only")]
    ReadOnly,

    #[error("Dataset lock poisoned")]
    Poisoned,
}

/// How a dataset handle is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// One named array and its attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Variable {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Self {
        Self {
            shape,
            values,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

/// The full content of a dataset. Serialized as-is by the JSON backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetDoc {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
}

impl DatasetDoc {
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_variable(mut self, name: &str, variable: Variable) -> Self {
        self.variables.insert(name.to_string(), variable);
        self
    }

    pub fn variable(&self, name: &str) -> Result<&Variable, StoreError> {
        self.variables
            .get(name)
            .ok_or_else(|| StoreError::MissingVariable(name.to_string()))
    }

    /// Overwrite all values of `name`; the shape is fixed.
    pub fn write_values(&mut self, name: &str, values: &[f64]) -> Result<(), StoreError> {
        let variable = self
            .variables
            .get_mut(name)
            .ok_or_else(|| StoreError::MissingVariable(name.to_string()))?;
        let expected = variable.element_count();
        if values.len() != expected {
            return Err(StoreError::ShapeMismatch {
                variable: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        variable.values = values.to_vec();
        Ok(())
    }

    pub fn write_attribute(&mut self, variable: &str, name: &str, value: &str) -> Result<(), StoreError> {
        let variable = self
            .variables
            .get_mut(variable)
            .ok_or_else(|| StoreError::MissingVariable(variable.to_string()))?;
        variable.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// A single open dataset.
pub trait Dataset {
    fn global_attribute(&self, name: &str) -> Option<String>;

    fn has_variable(&self, name: &str) -> bool;

    fn shape(&self, variable: &str) -> Result<Vec<usize>, StoreError>;

    fn read_values(&self, variable: &str) -> Result<Vec<f64>, StoreError>;

    fn attribute(&self, variable: &str, name: &str) -> Result<Option<String>, StoreError>;

    fn write_values(&mut self, variable: &str, values: &[f64]) -> Result<(), StoreError>;

    fn write_attribute(&mut self, variable: &str, name: &str, value: &str) -> Result<(), StoreError>;

    /// Commit pending writes. Either everything written so far lands, or nothing.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Read a `(N, 2)` variable as pairs.
    fn read_pairs(&self, variable: &str) -> Result<Vec<[f64; 2]>, StoreError> {
        let shape = self.shape(variable)?;
        let values = self.read_values(variable)?;
        if shape.len() != 2 || shape[1] != 2 || values.len() != shape[0] * 2 {
            return Err(StoreError::ShapeMismatch {
                variable: variable.to_string(),
                expected: shape.first().copied().unwrap_or(0) * 2,
                found: values.len(),
            });
        }
        Ok(values.chunks_exact(2).map(|c| [c[0], c[1]]).collect())
    }
}

/// Opens datasets by file name. Shared by all workers of a batch.
pub trait DatasetSource: Sync {
    type Handle: Dataset;

    fn open(&self, name: &str, access: Access) -> Result<Self::Handle, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_values_keeps_shape() {
        let mut doc = DatasetDoc::default().with_variable(TIME, Variable::new(vec![2], vec![0.5, 1.5]));
        doc.write_values(TIME, &[1.0, 2.0]).unwrap();
        assert_eq!(doc.variable(TIME).unwrap().values, vec![1.0, 2.0]);
        assert!(matches!(
            doc.write_values(TIME, &[1.0]),
            Err(StoreError::ShapeMismatch { expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            doc.write_values(TIME_BOUNDS, &[1.0]),
            Err(StoreError::MissingVariable(_))
        ));
    }
}
