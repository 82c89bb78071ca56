use std::sync::Arc;

use crate::config::ScoringConfig;
use crate::hierarchy::OntologyHierarchy;
use crate::idf::IdfTables;

/// Read-only inputs shared by every table of a run.
#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    pub hierarchy: OntologyHierarchy,
    pub idf: IdfTables,
    pub scoring: ScoringConfig,
}

impl ScoringContext {
    pub fn new(hierarchy: OntologyHierarchy, idf: IdfTables, scoring: ScoringConfig) -> Self {
        Self {
            hierarchy,
            idf,
            scoring,
        }
    }

    /// Wrap for sharing across workers.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// `depth / max_depth` of the hierarchy, 0 when it is flat.
    pub fn relative_depth(&self, depth: u32) -> f64 {
        self.hierarchy.relative_depth(depth)
    }

    pub fn is_root(&self, type_uri: &str) -> bool {
        type_uri == self.scoring.root_class
    }
}
