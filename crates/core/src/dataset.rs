//! The static dataset served by the API and embedded in every prompt.
//!
//! A `Dataset` is loaded once at startup and never mutated. Cloning only
//! bumps a reference count, so handlers can hold their own copy.

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, AppResult};

/// Immutable, shared JSON document.
#[derive(Debug, Clone)]
pub struct Dataset {
    value: Arc<Value>,
}

impl Dataset {
    /// Load the dataset from a JSON file.
    ///
    /// Any valid JSON is accepted. A top-level value that is not an array is
    /// logged as a warning but still served.
    pub fn load(path: &Path) -> AppResult<Self> {
        tracing::debug!("Loading dataset from: {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Dataset(format!("Failed to read dataset file {:?}: {}", path, e))
        })?;

        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            AppError::Dataset(format!("Failed to parse dataset file {:?}: {}", path, e))
        })?;

        let dataset = Self::from_value(value);
        match dataset.record_count() {
            Some(count) => tracing::info!("Loaded dataset with {} records", count),
            None => tracing::warn!("Dataset {:?} is not a JSON array; serving as-is", path),
        }

        Ok(dataset)
    }

    /// Wrap an already parsed value.
    pub fn from_value(value: Value) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// The document, exactly as loaded.
    pub fn get_dataset(&self) -> &Value {
        &self.value
    }

    /// Compact JSON text of the document.
    ///
    /// The HTTP layer and the prompt builder both use this form, so the
    /// dataset embedded in a prompt matches the served body byte for byte.
    pub fn canonical_text(&self) -> String {
        self.value.to_string()
    }

    /// Number of records when the document is an array.
    pub fn record_count(&self) -> Option<usize> {
        self.value.as_array().map(Vec::len)
    }
}
