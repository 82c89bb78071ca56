//! Hierarchy store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or storing the class hierarchy.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(String),

    /// Snapshot file could not be read or written.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid JSON.
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Backend name not recognized.
    #[error("Unknown hierarchy backend: {0}")]
    UnknownBackend(String),
}

impl HierarchyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HierarchyError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<surrealdb::Error> for HierarchyError {
    fn from(err: surrealdb::Error) -> Self {
        HierarchyError::Database(err.to_string())
    }
}
