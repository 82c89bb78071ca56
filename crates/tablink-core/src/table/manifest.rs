use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::TableError;
use crate::task::{TableTargets, TaskKind};

/// Targets of every table listed in a manifest, in first-seen table order.
///
/// Record layout depends on the task:
///
/// | task | columns                    |
/// |------|----------------------------|
/// | cea  | `table,column,row`         |
/// | cta  | `table,column`             |
/// | cpa  | `table,column,tail_column` |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskManifest {
    pub task: TaskKind,
    pub targets: Vec<TableTargets>,
}

impl TaskManifest {
    pub fn load(path: &Path, task: TaskKind) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|e| TableError::io(path, e))?;
        Self::from_reader(file, task)
    }

    pub fn from_reader(reader: impl Read, task: TaskKind) -> Result<Self, TableError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut targets: Vec<TableTargets> = Vec::new();

        for (i, record) in csv.records().enumerate() {
            let line = i as u64 + 1;
            let record = record.map_err(|e| TableError::Manifest {
                line,
                message: e.to_string(),
            })?;

            let table = record.get(0).unwrap_or_default();
            if table.is_empty() {
                continue;
            }

            let field = |pos: usize, what: &str| -> Result<usize, TableError> {
                let raw = record.get(pos).ok_or_else(|| TableError::Manifest {
                    line,
                    message: format!("missing {}", what),
                })?;
                raw.parse().map_err(|_| TableError::Manifest {
                    line,
                    message: format!("invalid {} '{}'", what, raw),
                })
            };

            let slot = *index.entry(table.to_string()).or_insert_with(|| {
                targets.push(TableTargets::new(table));
                targets.len() - 1
            });
            let entry = &mut targets[slot];

            entry.add_column(field(1, "column")?);
            match task {
                TaskKind::CellEntity => {
                    entry.rows.insert(field(2, "row")?);
                }
                TaskKind::ColumnType => {}
                TaskKind::ColumnPair => entry.add_tail_column(field(2, "tail column")?),
            }
        }

        Ok(Self { task, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_manifest() {
        let csv = "t1,0,3\nt2,1,1\nt1,0,1\nt1,2,1\n";
        let manifest = TaskManifest::from_reader(csv.as_bytes(), TaskKind::CellEntity).unwrap();

        assert_eq!(manifest.len(), 2);
        let t1 = &manifest.targets[0];
        assert_eq!(t1.table, "t1");
        assert_eq!(t1.columns, vec![0, 2]);
        assert_eq!(t1.rows.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_column_pair_manifest() {
        let csv = "t1,0,2\nt1,0,3\n";
        let manifest = TaskManifest::from_reader(csv.as_bytes(), TaskKind::ColumnPair).unwrap();
        assert_eq!(manifest.targets[0].columns, vec![0]);
        assert_eq!(manifest.targets[0].tail_columns, vec![2, 3]);
    }

    #[test]
    fn test_typing_manifest_ignores_extra_fields() {
        let csv = "t1,1\nt1,1\nt1,4,extra\n";
        let manifest = TaskManifest::from_reader(csv.as_bytes(), TaskKind::ColumnType).unwrap();
        assert_eq!(manifest.targets[0].columns, vec![1, 4]);
        assert!(manifest.targets[0].rows.is_empty());
    }

    #[test]
    fn test_invalid_record() {
        let csv = "t1,0,1\nt1,x,1\n";
        let err = TaskManifest::from_reader(csv.as_bytes(), TaskKind::CellEntity).unwrap_err();
        assert!(matches!(err, TableError::Manifest { line: 2, .. }));

        let csv = "t1,0\n";
        let err = TaskManifest::from_reader(csv.as_bytes(), TaskKind::CellEntity).unwrap_err();
        assert!(matches!(err, TableError::Manifest { line: 1, .. }));
    }
}
