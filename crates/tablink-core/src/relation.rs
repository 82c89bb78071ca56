//! Relation extraction for column pairs.

use std::collections::{HashMap, HashSet};

use crate::ranking::AggregatedCandidate;

/// Outgoing relations per entity: `entity -> [(relation, [object])]`.
pub type RelationMap = HashMap<String, Vec<(String, Vec<String>)>>;

/// The relation chosen between two columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    pub head_column: usize,
    pub tail_column: usize,
    pub relation_uri: String,
    /// Rows in which the relation links the head and tail winners.
    pub support_count: usize,
}

/// Finds the relation linking head and tail winners row by row.
pub struct RelationExtractor<'a> {
    relations: &'a RelationMap,
}

impl<'a> RelationExtractor<'a> {
    pub fn new(relations: &'a RelationMap) -> Self {
        Self { relations }
    }

    /// Relations of `head` whose objects contain `tail`, in map order.
    fn linking(&self, head: &str, tail: &str) -> Vec<&'a str> {
        let relations: &'a RelationMap = self.relations;
        let mut found = Vec::new();
        if let Some(edges) = relations.get(head) {
            for (relation, objects) in edges {
                if objects.iter().any(|o| o == tail) && !found.contains(&relation.as_str()) {
                    found.push(relation.as_str());
                }
            }
        }
        found
    }

    /// One edge per `(head_column, tail_column)` pair with at least one match.
    ///
    /// Support is counted per relation; the best supported relation wins and
    /// ties go to the relation seen first. Pairs come out in first-seen order.
    pub fn extract(&self, heads: &[AggregatedCandidate], tails: &[AggregatedCandidate]) -> Vec<RelationEdge> {
        let mut pair_order: Vec<(usize, usize)> = Vec::new();
        let mut relation_order: HashMap<(usize, usize), Vec<&'a str>> = HashMap::new();
        let mut support: HashMap<(usize, usize, &'a str), usize> = HashMap::new();
        let mut counted: HashSet<(usize, usize, usize, &'a str)> = HashSet::new();

        for head in heads {
            for tail in tails.iter().filter(|t| t.cell.row == head.cell.row) {
                let pair = (head.cell.column, tail.cell.column);

                for relation in self.linking(&head.entity_uri, &tail.entity_uri) {
                    if !counted.insert((pair.0, pair.1, head.cell.row, relation)) {
                        continue;
                    }

                    let order = relation_order.entry(pair).or_default();
                    if order.is_empty() && !pair_order.contains(&pair) {
                        pair_order.push(pair);
                    }
                    if !order.contains(&relation) {
                        order.push(relation);
                    }
                    *support.entry((pair.0, pair.1, relation)).or_insert(0) += 1;
                }
            }
        }

        pair_order
            .into_iter()
            .filter_map(|pair| {
                let relations = relation_order.get(&pair)?;
                let mut best: Option<(&str, usize)> = None;
                for &relation in relations {
                    let count = support.get(&(pair.0, pair.1, relation)).copied().unwrap_or(0);
                    if best.map_or(true, |(_, c)| count > c) {
                        best = Some((relation, count));
                    }
                }

                best.map(|(relation, support_count)| RelationEdge {
                    head_column: pair.0,
                    tail_column: pair.1,
                    relation_uri: relation.to_string(),
                    support_count,
                })
            })
            .collect()
    }
}
