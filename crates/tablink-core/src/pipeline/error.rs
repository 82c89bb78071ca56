use thiserror::Error;

use crate::config::ConfigError;
use crate::hierarchy::HierarchyError;
use crate::idf::IdfError;
use crate::output::OutputError;
use crate::search::SearchError;
use crate::table::TableError;

/// Errors that can occur while running a task.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("IDF error: {0}")]
    Idf(#[from] IdfError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Worker task failed: {0}")]
    Join(String),
}

impl PipelineError {
    /// Whether the whole run has to stop, as opposed to skipping one table.
    pub fn is_fatal(&self) -> bool {
        match self {
            PipelineError::Search(e) => e.is_fatal(),
            PipelineError::Table(_) => false,
            _ => true,
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Join(err.to_string())
    }
}
