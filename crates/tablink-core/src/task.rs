use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The three annotation tasks tablink can run.
///
/// Each task samples different cells and produces a different kind of
/// result record:
/// CellEntity → one entity per cell, ColumnType → one type per column,
/// ColumnPair → one relation per column pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Cell-entity annotation
    #[default]
    #[serde(rename = "cea", alias = "cell-entity")]
    CellEntity,
    /// Column-type annotation
    #[serde(rename = "cta", alias = "column-type")]
    ColumnType,
    /// Column-pair relation annotation
    #[serde(rename = "cpa", alias = "column-pair")]
    ColumnPair,
}

impl TaskKind {
    /// Short name used in configuration and output file names.
    pub fn short_name(&self) -> &'static str {
        match self {
            TaskKind::CellEntity => "cea",
            TaskKind::ColumnType => "cta",
            TaskKind::ColumnPair => "cpa",
        }
    }

    /// Returns a human-readable name for the task.
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskKind::CellEntity => "Cell-entity matching",
            TaskKind::ColumnType => "Column typing",
            TaskKind::ColumnPair => "Column-pair relation",
        }
    }

    /// Whether rows come from the manifest rather than a fixed sample.
    pub fn uses_manifest_rows(&self) -> bool {
        matches!(self, TaskKind::CellEntity)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cea" | "cell-entity" => Ok(TaskKind::CellEntity),
            "cta" | "column-type" => Ok(TaskKind::ColumnType),
            "cpa" | "column-pair" => Ok(TaskKind::ColumnPair),
            other => Err(format!("unknown task: {}", other)),
        }
    }
}

/// What has to be annotated in one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableTargets {
    /// Table name (file stem).
    pub table: String,
    /// Columns to annotate, in manifest order.
    pub columns: Vec<usize>,
    /// Tail columns for the column-pair task, in manifest order.
    pub tail_columns: Vec<usize>,
    /// Rows to annotate for the cell task.
    pub rows: BTreeSet<usize>,
}

impl TableTargets {
    /// Creates empty targets for a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Adds a column, keeping first-seen order.
    pub fn add_column(&mut self, column: usize) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Adds a tail column, keeping first-seen order.
    pub fn add_tail_column(&mut self, column: usize) {
        if !self.tail_columns.contains(&column) {
            self.tail_columns.push(column);
        }
    }

    /// Rows to sample for a task.
    ///
    /// The cell task uses the manifest rows; the other tasks take the first
    /// `sample_rows` data rows (row 0 holds the table header).
    pub fn sampled_rows(&self, task: TaskKind, sample_rows: usize) -> Vec<usize> {
        if task.uses_manifest_rows() {
            self.rows.iter().copied().collect()
        } else {
            (1..=sample_rows).collect()
        }
    }
}
