//! Candidate ranking.
//!
//! Turns the raw search hits of one table into final answers:
//!
//! - [`ColumnProfiler`] summarizes the first pass per column so the search
//!   can be refined
//! - [`RankingEngine`] merges, scores and picks one winner per cell
//! - [`annotate_column_types`] reduces cell winners to one type per column
//!
//! All inputs shared across tables live in a [`ScoringContext`].

mod column_type;
mod context;
mod engine;
mod profile;
mod signal;

pub use column_type::{annotate_column_types, ColumnTypeAnnotation};
pub use context::ScoringContext;
pub use engine::{AggregatedCandidate, RankingEngine};
pub use profile::{ColumnProfile, ColumnProfiler};
pub use signal::{CandidateSignal, CellRef, Facet};
