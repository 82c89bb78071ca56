use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

use super::{normalize_scores, CandidateDocument, SearchBackend, SearchError};
use crate::config::SearchConfig;

/// Elasticsearch client over the `_search` HTTP API.
///
/// Documents are expected to carry `uri`, `labels`, `categories`, `types`
/// and `objects` (a list of `[relation_uri, [object_uri, ...]]` pairs).
pub struct ElasticBackend {
    base_url: String,
    min_score: f64,
    client: Client,
}

impl ElasticBackend {
    /// Creates a client for the cluster at `base_url` (e.g. "http://localhost:9200").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            min_score: crate::config::DEFAULT_MIN_SCORE,
            client: Client::new(),
        }
    }

    /// Creates a client from the `[search]` configuration section.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            min_score: config.min_score,
            client,
        })
    }

    /// Sets the minimum raw score a hit needs.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    async fn send_query(&self, index: &str, query: Value, size: usize) -> Result<Vec<CandidateDocument>, SearchError> {
        let body = json!({
            "min_score": self.min_score,
            "sort": ["_score"],
            "size": size,
            "query": query,
        });

        let url = format!("{}/{}/_search", self.base_url, index);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let hits = parsed.hits.hits;
        debug!(index, hits = hits.len(), "search returned");

        let raw: Vec<f64> = hits.iter().map(|h| h.score.unwrap_or(0.0)).collect();
        let relevance = normalize_scores(&raw);

        Ok(hits
            .into_iter()
            .zip(relevance)
            .map(|(hit, relevance)| CandidateDocument {
                relevance,
                ..hit.source
            })
            .collect())
    }
}

#[async_trait]
impl SearchBackend for ElasticBackend {
    async fn search(
        &self,
        keyword: &str,
        related: &HashSet<String>,
        index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError> {
        self.send_query(index, lookup_query(keyword, related), size).await
    }

    async fn search_refined(
        &self,
        keyword: &str,
        categories: &[String],
        types: &[String],
        index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError> {
        self.send_query(index, refined_query(keyword, categories, types), size)
            .await
    }

    async fn search_phrase(
        &self,
        phrase: &str,
        index: &str,
        size: usize,
    ) -> Result<Vec<CandidateDocument>, SearchError> {
        self.send_query(index, phrase_query(phrase), size).await
    }
}

/// Exact label, label match, or an entity related to the row so far.
fn lookup_query(keyword: &str, related: &HashSet<String>) -> Value {
    let mut related: Vec<&str> = related.iter().map(String::as_str).collect();
    related.sort_unstable();

    json!({
        "dis_max": {
            "queries": [
                {"term": {"labels.keyword": {"value": keyword, "boost": 5}}},
                {"match": {"labels": keyword}},
                {"terms": {"uri.keyword": related}},
            ],
            "tie_breaker": 0.2
        }
    })
}

fn refined_query(keyword: &str, categories: &[String], types: &[String]) -> Value {
    json!({
        "bool": {
            "must": [
                {"match": {"labels": keyword}},
                {"terms": {"types.keyword": types}},
            ],
            "should": {"terms": {"categories.keyword": categories}}
        }
    })
}

/// Label match only; the table-name hint has no related entities yet.
fn phrase_query(phrase: &str) -> Value {
    json!({
        "match": {"labels": {"query": phrase}}
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitList,
}

#[derive(Debug, Deserialize)]
struct HitList {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: CandidateDocument,
}
