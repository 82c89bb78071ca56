//! Per-hit signals fed to the ranking engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table cell. Row 0 is the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// The facet a signal carries: one category or one ontology type of the hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "facet", rename_all = "lowercase")]
pub enum Facet {
    Category { uri: String, idf: f64 },
    Type { uri: String, idf: f64, depth: u32 },
}

impl Facet {
    pub fn uri(&self) -> &str {
        match self {
            Facet::Category { uri, .. } | Facet::Type { uri, .. } => uri,
        }
    }

    pub fn idf(&self) -> f64 {
        match self {
            Facet::Category { idf, .. } | Facet::Type { idf, .. } => *idf,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Facet::Type { .. })
    }
}

/// One facet of one search hit for one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub cell: CellRef,
    /// Cleaned cell value that was searched.
    pub keyword: String,
    /// Labels of the candidate entity.
    pub labels: Vec<String>,
    pub entity_uri: String,
    pub facet: Facet,
    /// Normalized backend score in `[0, 1]`.
    pub relevance: f64,
}

impl CandidateSignal {
    pub fn category(
        cell: CellRef,
        keyword: impl Into<String>,
        labels: Vec<String>,
        entity_uri: impl Into<String>,
        category: impl Into<String>,
        idf: f64,
        relevance: f64,
    ) -> Self {
        Self {
            cell,
            keyword: keyword.into(),
            labels,
            entity_uri: entity_uri.into(),
            facet: Facet::Category {
                uri: category.into(),
                idf,
            },
            relevance,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn typed(
        cell: CellRef,
        keyword: impl Into<String>,
        labels: Vec<String>,
        entity_uri: impl Into<String>,
        type_uri: impl Into<String>,
        idf: f64,
        depth: u32,
        relevance: f64,
    ) -> Self {
        Self {
            cell,
            keyword: keyword.into(),
            labels,
            entity_uri: entity_uri.into(),
            facet: Facet::Type {
                uri: type_uri.into(),
                idf,
                depth,
            },
            relevance,
        }
    }
}
