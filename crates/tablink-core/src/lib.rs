//! Table annotation against a knowledge base.
//!
//! Links table cells to entities, infers column types and finds the
//! relations between column pairs. Candidates come from a [`SearchBackend`]
//! and are ranked with label similarity, column frequency, IDF and depth in
//! the [`OntologyHierarchy`].

pub mod config;
pub mod hierarchy;
pub mod idf;
pub mod matcher;
pub mod output;
pub mod pipeline;
pub mod ranking;
pub mod relation;
pub mod search;
pub mod table;
pub mod task;
pub mod text;

pub use config::Config;
pub use hierarchy::{HierarchyStore, OntologyHierarchy, SnapshotStore, SurrealHierarchyStore};
pub use idf::IdfTables;
pub use matcher::{ColumnMatcher, MatchOutput};
pub use output::ResultWriter;
pub use pipeline::{Annotator, Orchestrator, PipelineError, RunReport, TableAnnotation, TableJob, TableOutcome};
pub use ranking::{AggregatedCandidate, CandidateSignal, CellRef, RankingEngine, ScoringContext};
pub use relation::{RelationEdge, RelationExtractor, RelationMap};
pub use search::{CandidateDocument, ElasticBackend, SearchBackend, SearchError};
pub use table::{Table, TaskManifest};
pub use task::{TableTargets, TaskKind};
