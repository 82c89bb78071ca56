//! Search backend abstraction.
//!
//! The backend returns candidate entity documents for a cell keyword. Two
//! query shapes are used per table: a broad first pass biased towards
//! entities related to what the row already matched, and a refined second
//! pass constrained by the column profile.

mod elastic;
mod error;

pub use elastic::ElasticBackend;
pub use error::SearchError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A knowledge base entity returned by the search backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    /// Entity URI.
    pub uri: String,

    /// Surface labels of the entity.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Category URIs.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Ontology class URIs.
    #[serde(default)]
    pub types: Vec<String>,

    /// Outgoing relations as `(relation_uri, [object_uri])`.
    #[serde(default)]
    pub objects: Vec<(String, Vec<String>)>,

    /// Min-max normalized score within the result list.
    #[serde(default)]
    pub relevance: f64,
}

impl CandidateDocument {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Every object URI across all relations.
    pub fn object_uris(&self) -> impl Iterator<Item = &str> {
        self.objects
            .iter()
            .flat_map(|(_, objects)| objects.iter().map(String::as_str))
    }
}

/// Candidate lookup against an entity index.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// First-pass lookup: exact label, label match, or a related entity.
    async fn search(
        &self,
        keyword: &str,
        related: &HashSet<String>,
        index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError>;

    /// Second-pass lookup: label match restricted to `types`, boosted by `categories`.
    async fn search_refined(
        &self,
        keyword: &str,
        categories: &[String],
        types: &[String],
        index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError>;

    /// Phrase lookup used for the table-name hint.
    async fn search_phrase(
        &self,
        phrase: &str,
        index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError> {
        self.search(phrase, &HashSet::new(), index, size).await
    }
}

/// Min-max normalize raw scores into `[0, 1]`; all-equal scores become 1.0.
pub fn normalize_scores(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    raw.iter()
        .map(|score| if spread > 0.0 { (score - min) / spread } else { 1.0 })
        .collect()
}
