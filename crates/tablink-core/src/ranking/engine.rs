//! Candidate ranking.
//!
//! Signals of one table are merged per `(cell, entity)`, deduplicated,
//! scored and reduced to one winner per cell. Scoring is deterministic: the
//! same signals in the same order always produce the same winners.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::context::ScoringContext;
use super::signal::{CandidateSignal, CellRef, Facet};
use crate::task::TaskKind;
use crate::text::{label_from_uri, max_similarity, similarity};

/// A candidate entity for one cell after facet merge and scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCandidate {
    pub cell: CellRef,
    pub keyword: String,
    pub entity_uri: String,
    /// Category facet, `None` for the placeholder.
    pub category: Option<String>,
    /// Type facet, `None` for the placeholder.
    pub type_uri: Option<String>,
    /// Hierarchy depth of the type, 0 without a type.
    pub depth: u32,
    pub relevance: f64,
    pub similarity: f64,
    pub category_freq: f64,
    pub type_freq: f64,
    pub final_score: f64,
}

/// One row of the facet merge. Borrowed from the input signals.
struct Merged<'s> {
    cell: CellRef,
    entity: &'s str,
    keyword: &'s str,
    labels: &'s [String],
    category: Option<(&'s str, f64)>,
    type_facet: Option<(&'s str, f64, u32)>,
    relevance: f64,
}

type EntityKey<'s> = (CellRef, &'s str);

fn category_facet(signal: &CandidateSignal) -> Option<(&str, f64)> {
    match &signal.facet {
        Facet::Category { uri, idf } => Some((uri.as_str(), *idf)),
        Facet::Type { .. } => None,
    }
}

fn type_facet(signal: &CandidateSignal) -> Option<(&str, f64, u32)> {
    match &signal.facet {
        Facet::Type { uri, idf, depth } => Some((uri.as_str(), *idf, *depth)),
        Facet::Category { .. } => None,
    }
}

/// Scores candidates and picks winners.
pub struct RankingEngine {
    ctx: Arc<ScoringContext>,
}

impl RankingEngine {
    pub fn new(ctx: Arc<ScoringContext>) -> Self {
        Self { ctx }
    }

    /// Winning candidate per cell, in the order cells first appear in `signals`.
    ///
    /// Cells without any candidate are absent from the result.
    pub fn rank(&self, signals: &[CandidateSignal], task: TaskKind) -> Vec<AggregatedCandidate> {
        let mut cell_order: Vec<CellRef> = Vec::new();
        let mut seen = HashSet::new();
        for signal in signals {
            if seen.insert(signal.cell) {
                cell_order.push(signal.cell);
            }
        }

        let scored = self.score(signals, task);

        let mut best: HashMap<CellRef, f64> = HashMap::new();
        for candidate in &scored {
            let entry = best.entry(candidate.cell).or_insert(f64::NEG_INFINITY);
            *entry = entry.max(candidate.final_score);
        }

        // First entity at the best score wins; among its rows the deepest type is kept.
        let mut winners: HashMap<CellRef, AggregatedCandidate> = HashMap::new();
        for candidate in scored {
            if !best.get(&candidate.cell).is_some_and(|b| candidate.final_score >= *b) {
                continue;
            }
            let replace = match winners.get(&candidate.cell) {
                None => true,
                Some(current) => {
                    current.entity_uri == candidate.entity_uri && candidate.depth > current.depth
                }
            };
            if replace {
                winners.insert(candidate.cell, candidate);
            }
        }

        debug!(cells = cell_order.len(), winners = winners.len(), "ranked candidates");

        cell_order
            .into_iter()
            .filter_map(|cell| winners.remove(&cell))
            .collect()
    }

    /// All scored candidates after merge and deduplication, highest relevance first.
    ///
    /// Returns nothing for the typing task when no type signal survives.
    pub fn score(&self, signals: &[CandidateSignal], task: TaskKind) -> Vec<AggregatedCandidate> {
        let kept: Vec<&CandidateSignal> = signals
            .iter()
            .filter(|s| !(s.facet.is_type() && self.ctx.is_root(s.facet.uri())))
            .collect();

        let has_categories = kept.iter().any(|s| !s.facet.is_type());
        let has_types = kept.iter().any(|s| s.facet.is_type());

        if !has_types && task == TaskKind::ColumnType {
            return Vec::new();
        }
        if kept.is_empty() {
            return Vec::new();
        }

        let rows = deduplicate(merge(&kept));

        let similarities = self.similarities(&rows);

        let category_freq = if has_categories {
            let values: Vec<Option<&str>> = rows.iter().map(|r| r.category.map(|(u, _)| u)).collect();
            let relative = relative_counts(&rows, &values);
            let scoring = &self.ctx.scoring;
            let freq = rows
                .iter()
                .zip(relative)
                .map(|(row, rel)| match row.category {
                    Some((_, idf)) => {
                        rel * scoring.category_frequency_weight + idf * scoring.category_idf_weight
                    }
                    None => 0.0,
                })
                .collect();
            broadcast_max(&rows, freq)
        } else {
            vec![0.0; rows.len()]
        };

        let type_freq = if has_types {
            let values: Vec<Option<&str>> = rows.iter().map(|r| r.type_facet.map(|(u, _, _)| u)).collect();
            let relative = relative_counts(&rows, &values);
            let scoring = &self.ctx.scoring;
            let freq = rows
                .iter()
                .zip(relative)
                .map(|(row, rel)| match row.type_facet {
                    Some((_, idf, depth)) => {
                        rel * scoring.type_frequency_weight
                            + idf * scoring.type_idf_weight
                            + self.ctx.relative_depth(depth) * scoring.type_depth_weight
                    }
                    None => 0.0,
                })
                .collect();
            broadcast_max(&rows, freq)
        } else {
            vec![0.0; rows.len()]
        };

        // Largest multiplier the present facets can reach.
        let max_multiplier = if has_categories && has_types { 1.5 } else { 1.0 };

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let multiplier = 0.5 + 0.5 * category_freq[i] + 0.5 * type_freq[i];
                let final_score =
                    (similarities[i] * row.relevance * multiplier / max_multiplier).clamp(0.0, 1.0);

                AggregatedCandidate {
                    cell: row.cell,
                    keyword: row.keyword.to_string(),
                    entity_uri: row.entity.to_string(),
                    category: row.category.map(|(u, _)| u.to_string()),
                    type_uri: row.type_facet.map(|(u, _, _)| u.to_string()),
                    depth: row.type_facet.map(|(_, _, d)| d).unwrap_or(0),
                    relevance: row.relevance,
                    similarity: similarities[i],
                    category_freq: category_freq[i],
                    type_freq: type_freq[i],
                    final_score,
                }
            })
            .collect()
    }

    /// Keyword/label similarity, computed once per `(cell, entity)`.
    fn similarities(&self, rows: &[Merged<'_>]) -> Vec<f64> {
        let mut cache: HashMap<EntityKey<'_>, f64> = HashMap::new();

        rows.iter()
            .map(|row| {
                *cache.entry((row.cell, row.entity)).or_insert_with(|| {
                    if row.labels.is_empty() {
                        similarity(row.keyword, &label_from_uri(row.entity))
                    } else {
                        max_similarity(row.keyword, row.labels)
                    }
                })
            })
            .collect()
    }
}

/// Join category and type signals on `(cell, entity)`.
///
/// Every category row pairs with every type row of the same key; a key with
/// only one facet keeps its rows with the other facet as placeholder.
fn merge<'s>(signals: &[&'s CandidateSignal]) -> Vec<Merged<'s>> {
    let mut order: Vec<EntityKey<'s>> = Vec::new();
    let mut groups: HashMap<EntityKey<'s>, (Vec<&'s CandidateSignal>, Vec<&'s CandidateSignal>)> =
        HashMap::new();

    for &signal in signals {
        let key = (signal.cell, signal.entity_uri.as_str());
        if !groups.contains_key(&key) {
            order.push(key);
        }
        let (categories, types) = groups.entry(key).or_default();
        if signal.facet.is_type() {
            types.push(signal);
        } else {
            categories.push(signal);
        }
    }

    let mut rows = Vec::new();
    for key in order {
        let Some((categories, types)) = groups.remove(&key) else {
            continue;
        };

        let row = |source: &'s CandidateSignal, cat, ty| Merged {
            cell: key.0,
            entity: key.1,
            keyword: source.keyword.as_str(),
            labels: source.labels.as_slice(),
            category: cat,
            type_facet: ty,
            relevance: source.relevance,
        };

        match (categories.is_empty(), types.is_empty()) {
            (false, false) => {
                for &c in &categories {
                    for &t in &types {
                        rows.push(row(c, category_facet(c), type_facet(t)));
                    }
                }
            }
            (false, true) => {
                for &c in &categories {
                    rows.push(row(c, category_facet(c), None));
                }
            }
            (true, false) => {
                for &t in &types {
                    rows.push(row(t, None, type_facet(t)));
                }
            }
            (true, true) => {}
        }
    }

    rows
}

/// Keep the highest-relevance row per `(cell, entity, type, category)`.
///
/// The stable sort leaves earlier rows first on equal relevance.
fn deduplicate(mut rows: Vec<Merged<'_>>) -> Vec<Merged<'_>> {
    rows.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

    let mut seen = HashSet::new();
    rows.retain(|r| {
        seen.insert((
            r.cell,
            r.entity,
            r.type_facet.map(|(u, _, _)| u),
            r.category.map(|(u, _)| u),
        ))
    });
    rows
}

/// Distinct rows carrying a value within its column, over the column maximum.
fn relative_counts(rows: &[Merged<'_>], values: &[Option<&str>]) -> Vec<f64> {
    let mut row_sets: HashMap<(usize, Option<&str>), HashSet<usize>> = HashMap::new();
    for (row, value) in rows.iter().zip(values) {
        row_sets
            .entry((row.cell.column, *value))
            .or_default()
            .insert(row.cell.row);
    }

    let mut column_max: HashMap<usize, usize> = HashMap::new();
    for ((column, _), set) in &row_sets {
        let max = column_max.entry(*column).or_insert(0);
        *max = (*max).max(set.len());
    }

    rows.iter()
        .zip(values)
        .map(|(row, value)| {
            let count = row_sets
                .get(&(row.cell.column, *value))
                .map_or(0, HashSet::len);
            let max = column_max.get(&row.cell.column).copied().unwrap_or(0);
            if max == 0 {
                0.0
            } else {
                count as f64 / max as f64
            }
        })
        .collect()
}

/// Replace each value by the maximum over rows sharing `(cell, entity)`.
fn broadcast_max(rows: &[Merged<'_>], values: Vec<f64>) -> Vec<f64> {
    let mut max: HashMap<EntityKey<'_>, f64> = HashMap::new();
    for (row, value) in rows.iter().zip(&values) {
        let entry = max.entry((row.cell, row.entity)).or_insert(f64::NEG_INFINITY);
        *entry = entry.max(*value);
    }

    rows.iter()
        .zip(values)
        .map(|(row, value)| max.get(&(row.cell, row.entity)).copied().unwrap_or(value))
        .collect()
}
