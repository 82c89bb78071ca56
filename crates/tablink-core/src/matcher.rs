//! Two-pass candidate lookup for the target columns of one table.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::SearchConfig;
use crate::ranking::{CandidateSignal, CellRef, ColumnProfile, ColumnProfiler, ScoringContext};
use crate::relation::RelationMap;
use crate::search::{CandidateDocument, SearchBackend, SearchError};
use crate::table::RowKeywords;

/// Signals of both passes plus the relations of every entity seen.
#[derive(Debug, Clone, Default)]
pub struct MatchOutput {
    pub signals: Vec<CandidateSignal>,
    pub relations: RelationMap,
}

/// Search phrase derived from a table name: `_` as space, cut at `#`.
///
/// Names made only of digits (and separators) give no hint.
pub fn hint_phrase(table: &str) -> Option<String> {
    let name = table.replace('_', " ");
    let name = match name.find('#') {
        Some(idx) => &name[..idx],
        None => name.as_str(),
    };
    let name = name.trim();

    if name.is_empty() || name.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
        None
    } else {
        Some(name.to_string())
    }
}

/// Drives the search backend for one table.
pub struct ColumnMatcher<'a> {
    backend: &'a dyn SearchBackend,
    ctx: &'a ScoringContext,
    search: &'a SearchConfig,
}

impl<'a> ColumnMatcher<'a> {
    pub fn new(backend: &'a dyn SearchBackend, ctx: &'a ScoringContext, search: &'a SearchConfig) -> Self {
        Self { backend, ctx, search }
    }

    /// Object URIs of the best entity matching the table name.
    pub async fn table_hint(&self, table: &str) -> Result<Vec<String>, SearchError> {
        let Some(phrase) = hint_phrase(table) else {
            return Ok(Vec::new());
        };

        let hits = self
            .backend
            .search_phrase(&phrase, &self.search.index, self.search.hint_size)
            .await?;

        let seed: Vec<String> = hits
            .first()
            .map(|doc| doc.object_uris().map(str::to_string).collect())
            .unwrap_or_default();

        debug!(table, phrase = %phrase, seed = seed.len(), "table name hint");
        Ok(seed)
    }

    /// Search every keyword twice: broadly, then constrained by the column profile.
    pub async fn match_rows(
        &self,
        rows: &[RowKeywords],
        index: &str,
        seed: &[String],
    ) -> Result<MatchOutput, SearchError> {
        let mut output = MatchOutput::default();

        for row in rows {
            let mut related: HashSet<String> = seed.iter().cloned().collect();

            for (column, keyword) in &row.cells {
                let hits = self
                    .backend
                    .search(keyword, &related, index, self.search.candidate_size)
                    .await?;

                for doc in &hits {
                    related.extend(doc.object_uris().map(str::to_string));
                    self.collect(&mut output, CellRef::new(*column, row.row), keyword, doc);
                }
            }
        }

        let first_pass = output.signals.len();

        let profiles: HashMap<usize, ColumnProfile> = ColumnProfiler::new(self.ctx)
            .profile_columns(&output.signals)
            .into_iter()
            .map(|p| (p.column, p))
            .collect();

        for row in rows {
            for (column, keyword) in &row.cells {
                let Some(profile) = profiles.get(column).filter(|p| p.can_refine()) else {
                    continue;
                };

                let hits = self
                    .backend
                    .search_refined(
                        keyword,
                        &profile.top_categories,
                        &profile.top_types,
                        index,
                        self.search.refine_size,
                    )
                    .await?;

                for doc in &hits {
                    self.collect(&mut output, CellRef::new(*column, row.row), keyword, doc);
                }
            }
        }

        debug!(
            index,
            rows = rows.len(),
            first_pass,
            refined = output.signals.len() - first_pass,
            "matched table"
        );

        Ok(output)
    }

    /// Record the hit's relations and turn its facets into signals.
    fn collect(&self, output: &mut MatchOutput, cell: CellRef, keyword: &str, doc: &CandidateDocument) {
        output
            .relations
            .entry(doc.uri.clone())
            .or_insert_with(|| doc.objects.clone());

        for category in &doc.categories {
            output.signals.push(CandidateSignal::category(
                cell,
                keyword,
                doc.labels.clone(),
                &doc.uri,
                category,
                self.ctx.idf.category(category),
                doc.relevance,
            ));
        }

        for type_uri in &doc.types {
            if self.ctx.scoring.is_ignored_type(type_uri) {
                continue;
            }
            output.signals.push(CandidateSignal::typed(
                cell,
                keyword,
                doc.labels.clone(),
                &doc.uri,
                type_uri,
                self.ctx.idf.type_idf(type_uri),
                self.ctx.hierarchy.depth_or_zero(type_uri),
                doc.relevance,
            ));
        }
    }
}
