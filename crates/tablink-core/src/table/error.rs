use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading tables and the task manifest.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {message}", path.display())]
    Csv { path: PathBuf, message: String },

    #[error("Invalid manifest record {line}: {message}")]
    Manifest { line: u64, message: String },

    #[error("Table has no rows: {0}")]
    Empty(String),
}

impl TableError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TableError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        TableError::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
