//! Inverse-document-frequency tables for categories and types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::IdfConfig;

#[derive(Debug, Error)]
pub enum IdfError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid IDF table {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Read-only IDF lookups. Missing entries weigh 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTables {
    #[serde(default)]
    categories: HashMap<String, f64>,
    #[serde(default)]
    types: HashMap<String, f64>,
}

impl IdfTables {
    pub fn new(categories: HashMap<String, f64>, types: HashMap<String, f64>) -> Self {
        Self { categories, types }
    }

    /// Load both tables from the JSON files named in the configuration.
    pub fn load(config: &IdfConfig) -> Result<Self, IdfError> {
        let categories = read_table(Path::new(&config.categories))?;
        let types = read_table(Path::new(&config.types))?;
        debug!(
            categories = categories.len(),
            types = types.len(),
            "loaded IDF tables"
        );
        Ok(Self { categories, types })
    }

    pub fn category(&self, uri: &str) -> f64 {
        self.categories.get(uri).copied().unwrap_or(0.0)
    }

    pub fn type_idf(&self, uri: &str) -> f64 {
        self.types.get(uri).copied().unwrap_or(0.0)
    }
}

fn read_table(path: &Path) -> Result<HashMap<String, f64>, IdfError> {
    let json = fs::read_to_string(path).map_err(|source| IdfError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&json).map_err(|e| IdfError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
