//! Shared fixtures: an in-memory search backend and a small DBpedia-like hierarchy.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tablink_core::config::ScoringConfig;
use tablink_core::hierarchy::HierarchySnapshot;
use tablink_core::{CandidateDocument, IdfTables, OntologyHierarchy, ScoringContext, SearchBackend, SearchError};

/// Search backend answering from a keyword table.
#[derive(Default)]
pub struct FakeBackend {
    hits: HashMap<String, Vec<CandidateDocument>>,
    /// Keywords answered with an HTTP error status.
    failures: HashMap<String, u16>,
    unavailable: bool,
    searches: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails as if the cluster were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_hits(mut self, keyword: &str, docs: Vec<CandidateDocument>) -> Self {
        self.hits.insert(keyword.to_string(), docs);
        self
    }

    /// Answer `keyword` with a non-success status, as a rejected query would.
    pub fn with_api_error(mut self, keyword: &str, status: u16) -> Self {
        self.failures.insert(keyword.to_string(), status);
        self
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    fn lookup(&self, keyword: &str, size: usize) -> Result<Vec<CandidateDocument>, SearchError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(SearchError::Unavailable("connection refused".into()));
        }
        if let Some(&status) = self.failures.get(keyword) {
            return Err(SearchError::Api {
                status,
                message: format!("query for '{}' rejected", keyword),
            });
        }
        let mut docs = self.hits.get(keyword).cloned().unwrap_or_default();
        docs.truncate(size);
        Ok(docs)
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search(
        &self,
        keyword: &str,
        _related: &HashSet<String>,
        _index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError> {
        self.lookup(keyword, size)
    }

    async fn search_refined(
        &self,
        keyword: &str,
        _categories: &[String],
        types: &[String],
        _index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError> {
        let docs = self.lookup(keyword, usize::MAX)?;
        Ok(docs
            .into_iter()
            .filter(|d| d.types.iter().any(|t| types.contains(t)))
            .take(size)
            .collect())
    }
}

/// Entity document with a single label.
pub fn doc(uri: &str, label: &str, categories: &[&str], types: &[&str], relevance: f64) -> CandidateDocument {
    let mut doc = CandidateDocument::new(uri);
    doc.labels = vec![label.to_string()];
    doc.categories = categories.iter().map(|c| c.to_string()).collect();
    doc.types = types.iter().map(|t| t.to_string()).collect();
    doc.relevance = relevance;
    doc
}

pub fn places() -> HierarchySnapshot {
    HierarchySnapshot::from_pairs([
        ("dbo:City", "dbo:Settlement"),
        ("dbo:Settlement", "dbo:PopulatedPlace"),
        ("dbo:PopulatedPlace", "dbo:Place"),
        ("dbo:Country", "dbo:PopulatedPlace"),
        ("dbo:Lake", "dbo:BodyOfWater"),
        ("dbo:BodyOfWater", "dbo:Place"),
        ("dbo:Person", "dbo:Agent"),
    ])
    .with_diameter(7)
}

/// Context over [`places`] with empty IDF tables and default scoring.
pub fn context() -> ScoringContext {
    let scoring = ScoringConfig {
        root_class: "dbo:Agent".to_string(),
        ..ScoringConfig::default()
    };
    ScoringContext::new(OntologyHierarchy::build(&places()), IdfTables::default(), scoring)
}
