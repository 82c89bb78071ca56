//! Column profiles used to refine the second search pass.

use std::collections::HashMap;

use super::context::ScoringContext;
use super::signal::{CandidateSignal, Facet};

/// The most representative categories and types of a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnProfile {
    pub column: usize,
    pub top_categories: Vec<String>,
    pub top_types: Vec<String>,
}

impl ColumnProfile {
    pub fn is_empty(&self) -> bool {
        self.top_categories.is_empty() && self.top_types.is_empty()
    }

    /// The refined pass filters on types, so it only runs when some exist.
    pub fn can_refine(&self) -> bool {
        !self.top_types.is_empty()
    }
}

/// Counts facet occurrences per value in first-seen order.
#[derive(Default)]
struct Tally<'a> {
    order: Vec<&'a str>,
    counts: HashMap<&'a str, (usize, f64, u32)>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, uri: &'a str, idf: f64, depth: u32) {
        if !self.counts.contains_key(uri) {
            self.order.push(uri);
        }
        self.counts.entry(uri).or_insert((0, idf, depth)).0 += 1;
    }

    fn max_count(&self) -> usize {
        self.counts.values().map(|(c, _, _)| *c).max().unwrap_or(0)
    }

    fn top(&self, k: usize, weight: impl Fn(usize, f64, u32) -> f64) -> Vec<String> {
        let mut weighted: Vec<(&str, f64)> = self
            .order
            .iter()
            .map(|uri| {
                let (count, idf, depth) = self.counts[uri];
                (*uri, weight(count, idf, depth))
            })
            .collect();

        weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
        weighted.into_iter().take(k).map(|(uri, _)| uri.to_string()).collect()
    }
}

/// Builds [`ColumnProfile`]s from first-pass signals.
pub struct ColumnProfiler<'c> {
    ctx: &'c ScoringContext,
    top_k: usize,
}

impl<'c> ColumnProfiler<'c> {
    pub fn new(ctx: &'c ScoringContext) -> Self {
        Self {
            ctx,
            top_k: ctx.scoring.profile_top_k,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Profile a single column from the signals of that column.
    pub fn profile<'s>(
        &self,
        column: usize,
        signals: impl IntoIterator<Item = &'s CandidateSignal>,
    ) -> ColumnProfile {
        let mut categories = Tally::default();
        let mut types = Tally::default();

        for signal in signals {
            match &signal.facet {
                Facet::Category { uri, idf } => categories.add(uri, *idf, 0),
                Facet::Type { uri, idf, depth } => types.add(uri, *idf, *depth),
            }
        }

        let max_categories = categories.max_count().max(1) as f64;
        let max_types = types.max_count().max(1) as f64;

        ColumnProfile {
            column,
            top_categories: categories.top(self.top_k, |count, idf, _| {
                (count as f64 / max_categories) * idf
            }),
            top_types: types.top(self.top_k, |count, idf, depth| {
                (count as f64 / max_types) * self.ctx.relative_depth(depth) * idf
            }),
        }
    }

    /// Profile every column present in `signals`, in first-seen column order.
    pub fn profile_columns(&self, signals: &[CandidateSignal]) -> Vec<ColumnProfile> {
        let mut columns: Vec<usize> = Vec::new();
        for signal in signals {
            if !columns.contains(&signal.cell.column) {
                columns.push(signal.cell.column);
            }
        }

        columns
            .into_iter()
            .map(|column| {
                self.profile(
                    column,
                    signals.iter().filter(|s| s.cell.column == column),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{HierarchySnapshot, OntologyHierarchy};
    use crate::ranking::signal::CellRef;

    fn context() -> ScoringContext {
        let hierarchy = OntologyHierarchy::build(&HierarchySnapshot::from_pairs([
            ("City", "Settlement"),
            ("Settlement", "Place"),
            ("Lake", "Place"),
        ]));
        ScoringContext {
            hierarchy,
            ..Default::default()
        }
    }

    fn category(row: usize, uri: &str, idf: f64) -> CandidateSignal {
        CandidateSignal::category(CellRef::new(0, row), "k", vec![], "e", uri, idf, 1.0)
    }

    fn typed(row: usize, uri: &str, idf: f64, depth: u32) -> CandidateSignal {
        CandidateSignal::typed(CellRef::new(0, row), "k", vec![], "e", uri, idf, depth, 1.0)
    }

    #[test]
    fn test_empty_input() {
        let ctx = context();
        let profile = ColumnProfiler::new(&ctx).profile(0, &[]);
        assert!(profile.is_empty());
        assert!(!profile.can_refine());
    }

    #[test]
    fn test_fewer_than_k_are_not_padded() {
        let ctx = context();
        let signals = vec![category(1, "cat:A", 0.5), category(2, "cat:B", 0.5)];
        let profile = ColumnProfiler::new(&ctx).profile(0, &signals);
        assert_eq!(profile.top_categories, vec!["cat:A", "cat:B"]);
    }

    #[test]
    fn test_categories_weighted_by_frequency_and_idf() {
        let ctx = context();
        let signals = vec![
            category(1, "cat:Common", 0.1),
            category(2, "cat:Common", 0.1),
            category(3, "cat:Common", 0.1),
            category(1, "cat:Rare", 0.9),
            category(2, "cat:Rare", 0.9),
            category(1, "cat:Once", 0.2),
            category(1, "cat:Zero", 0.0),
        ];
        let profile = ColumnProfiler::new(&ctx).profile(0, &signals);
        // Rare 2/3*0.9=0.6, Common 1*0.1, Once 1/3*0.2
        assert_eq!(profile.top_categories, vec!["cat:Rare", "cat:Common", "cat:Once"]);
    }

    #[test]
    fn test_types_weighted_by_depth() {
        let ctx = context();
        let signals = vec![
            typed(1, "Place", 1.0, 0),
            typed(2, "Place", 1.0, 0),
            typed(1, "City", 0.5, 2),
            typed(2, "Lake", 0.5, 1),
        ];
        let profile = ColumnProfiler::new(&ctx).profile(0, &signals);
        assert_eq!(profile.top_types, vec!["City", "Lake", "Place"]);
        assert!(profile.can_refine());
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ctx = context();
        let signals = vec![category(1, "cat:B", 0.5), category(2, "cat:A", 0.5)];
        let profile = ColumnProfiler::new(&ctx).with_top_k(1).profile(0, &signals);
        assert_eq!(profile.top_categories, vec!["cat:B"]);
    }

    #[test]
    fn test_profile_columns_in_first_seen_order() {
        let ctx = context();
        let mut signals = vec![category(1, "cat:A", 0.5)];
        signals.push(CandidateSignal::category(CellRef::new(3, 1), "k", vec![], "e", "cat:C", 0.5, 1.0));
        signals[0].cell.column = 2;

        let profiles = ColumnProfiler::new(&ctx).profile_columns(&signals);
        let columns: Vec<usize> = profiles.iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![2, 3]);
    }
}
