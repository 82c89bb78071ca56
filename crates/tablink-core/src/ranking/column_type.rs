//! Column type decision from per-cell winners.

use std::cmp::Ordering;

use super::context::ScoringContext;
use super::engine::AggregatedCandidate;

/// The type chosen for a column together with its superclasses.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTypeAnnotation {
    pub column: usize,
    pub type_uri: String,
    /// Superclasses, nearest first, without the root class.
    pub ancestors: Vec<String>,
}

impl ColumnTypeAnnotation {
    /// `"type ancestor ancestor ..."`
    pub fn joined(&self) -> String {
        std::iter::once(self.type_uri.as_str())
            .chain(self.ancestors.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Pick one type per column among the cell winners that carry a type.
///
/// Candidates are ordered by `(type_freq, depth)` ascending and the last one
/// wins, so a later winner takes ties. Columns come out in first-seen order.
pub fn annotate_column_types(
    winners: &[AggregatedCandidate],
    ctx: &ScoringContext,
) -> Vec<ColumnTypeAnnotation> {
    let mut columns: Vec<usize> = Vec::new();
    for winner in winners {
        if winner.type_uri.is_some() && !columns.contains(&winner.cell.column) {
            columns.push(winner.cell.column);
        }
    }

    columns
        .into_iter()
        .filter_map(|column| {
            let mut typed: Vec<&AggregatedCandidate> = winners
                .iter()
                .filter(|w| w.cell.column == column && w.type_uri.is_some())
                .collect();

            typed.sort_by(|a, b| match a.type_freq.total_cmp(&b.type_freq) {
                Ordering::Equal => a.depth.cmp(&b.depth),
                other => other,
            });

            let chosen = typed.last()?;
            let type_uri = chosen.type_uri.clone()?;
            let ancestors = ctx
                .hierarchy
                .ancestor_uris(&type_uri)
                .into_iter()
                .filter(|a| !ctx.is_root(a))
                .map(str::to_string)
                .collect();

            Some(ColumnTypeAnnotation {
                column,
                type_uri,
                ancestors,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{HierarchySnapshot, OntologyHierarchy};
    use crate::ranking::signal::CellRef;

    const AGENT: &str = "http://dbpedia.org/ontology/Agent";

    fn winner(column: usize, row: usize, ty: Option<&str>, type_freq: f64, depth: u32) -> AggregatedCandidate {
        AggregatedCandidate {
            cell: CellRef::new(column, row),
            keyword: "k".into(),
            entity_uri: format!("dbr:E{}", row),
            category: None,
            type_uri: ty.map(str::to_string),
            depth,
            relevance: 1.0,
            similarity: 1.0,
            category_freq: 0.0,
            type_freq,
            final_score: 1.0,
        }
    }

    fn context() -> ScoringContext {
        ScoringContext {
            hierarchy: OntologyHierarchy::build(&HierarchySnapshot::from_pairs([
                ("dbo:Musician", "dbo:Artist"),
                ("dbo:Artist", "dbo:Person"),
                ("dbo:Person", AGENT),
            ])),
            ..Default::default()
        }
    }

    #[test]
    fn test_highest_type_freq_wins() {
        let ctx = context();
        let winners = vec![
            winner(0, 1, Some("dbo:Person"), 0.9, 2),
            winner(0, 2, Some("dbo:Musician"), 0.4, 3),
            winner(0, 3, None, 0.0, 0),
        ];

        let types = annotate_column_types(&winners, &ctx);
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].type_uri, "dbo:Person");
        assert!(types[0].ancestors.is_empty());
    }

    #[test]
    fn test_depth_breaks_ties_and_root_excluded() {
        let ctx = context();
        let winners = vec![
            winner(0, 1, Some("dbo:Musician"), 0.5, 3),
            winner(0, 2, Some("dbo:Artist"), 0.5, 2),
        ];

        let types = annotate_column_types(&winners, &ctx);
        assert_eq!(types[0].type_uri, "dbo:Musician");
        assert_eq!(types[0].ancestors, vec!["dbo:Artist", "dbo:Person"]);
        assert_eq!(types[0].joined(), "dbo:Musician dbo:Artist dbo:Person");
    }

    #[test]
    fn test_untyped_columns_are_skipped() {
        let ctx = context();
        let winners = vec![winner(1, 1, None, 0.0, 0), winner(2, 1, Some("dbo:Person"), 0.3, 2)];

        let columns: Vec<usize> = annotate_column_types(&winners, &ctx)
            .into_iter()
            .map(|t| t.column)
            .collect();
        assert_eq!(columns, vec![2]);
    }
}
