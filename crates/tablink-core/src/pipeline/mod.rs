//! Task execution.
//!
//! - [`Annotator`] runs the search passes and ranking for one table
//! - [`Orchestrator`] fans tables out over a bounded worker pool and writes
//!   results as they complete

mod annotator;
mod error;
mod orchestrator;

pub use annotator::{resolve, Annotator, TableAnnotation};
pub use error::PipelineError;
pub use orchestrator::{Orchestrator, RunReport, TableJob, TableOutcome};

use tracing::info;

use crate::config::Config;
use crate::hierarchy::load_hierarchy;
use crate::idf::IdfTables;
use crate::ranking::ScoringContext;

/// Load the hierarchy and IDF tables named by the configuration.
pub async fn load_context(config: &Config) -> Result<ScoringContext, PipelineError> {
    let hierarchy = load_hierarchy(&config.hierarchy).await?;
    info!(
        classes = hierarchy.len(),
        max_depth = hierarchy.max_depth(),
        anomalies = hierarchy.anomalies().count(),
        "loaded class hierarchy"
    );

    let idf = IdfTables::load(&config.idf)?;

    Ok(ScoringContext::new(hierarchy, idf, config.scoring.clone()))
}
