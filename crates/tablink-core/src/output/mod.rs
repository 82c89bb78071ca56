//! Result files.
//!
//! One fully quoted CSV per annotated table under the results directory,
//! plus one list of omitted tables per task.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::OutputConfig;
use crate::pipeline::TableAnnotation;
use crate::task::TaskKind;

/// Errors that can occur while writing results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl OutputError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OutputError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Writes per-table result files and the error list.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    results_dir: PathBuf,
    errors_path: PathBuf,
}

impl ResultWriter {
    /// Prepare the output directories and start a fresh error list.
    pub fn create(config: &OutputConfig, task: TaskKind) -> Result<Self, OutputError> {
        let results_dir = config.results_path();
        if !results_dir.exists() {
            fs::create_dir_all(&results_dir).map_err(|e| OutputError::io(&results_dir, e))?;
        }

        let errors_path = config.errors_path(task);
        fs::write(&errors_path, "").map_err(|e| OutputError::io(&errors_path, e))?;

        Ok(Self {
            results_dir,
            errors_path,
        })
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn errors_path(&self) -> &Path {
        &self.errors_path
    }

    /// Path of the result file for a table.
    pub fn result_path(&self, table: &str) -> PathBuf {
        self.results_dir.join(format!("{}.csv", table))
    }

    /// Write all records of a table in one go.
    pub fn write(&self, table: &str, annotation: &TableAnnotation) -> Result<PathBuf, OutputError> {
        let bytes = render(table, annotation)?;
        let path = self.result_path(table);
        fs::write(&path, bytes).map_err(|e| OutputError::io(&path, e))?;
        Ok(path)
    }

    /// Append a table name to the error list.
    pub fn record_error(&self, table: &str) -> Result<(), OutputError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.errors_path)
            .map_err(|e| OutputError::io(&self.errors_path, e))?;
        writeln!(file, "{}", table).map_err(|e| OutputError::io(&self.errors_path, e))
    }
}

/// Render the records of one table as fully quoted CSV.
pub fn render(table: &str, annotation: &TableAnnotation) -> Result<Vec<u8>, OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    match annotation {
        TableAnnotation::Cells(winners) => {
            for w in winners {
                let column = w.cell.column.to_string();
                let row = w.cell.row.to_string();
                writer.write_record([table, column.as_str(), row.as_str(), w.entity_uri.as_str()])?;
            }
        }
        TableAnnotation::Columns(types) => {
            for t in types {
                let column = t.column.to_string();
                let chain = t.joined();
                writer.write_record([table, column.as_str(), chain.as_str()])?;
            }
        }
        TableAnnotation::Relations(edges) => {
            for e in edges {
                let head = e.head_column.to_string();
                let tail = e.tail_column.to_string();
                writer.write_record([table, head.as_str(), tail.as_str(), e.relation_uri.as_str()])?;
            }
        }
    }

    writer
        .into_inner()
        .map_err(|e| OutputError::Csv(csv::Error::from(e.into_error())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::ColumnTypeAnnotation;
    use crate::relation::RelationEdge;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> OutputConfig {
        OutputConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_column_types() {
        let annotation = TableAnnotation::Columns(vec![ColumnTypeAnnotation {
            column: 1,
            type_uri: "dbo:City".into(),
            ancestors: vec!["dbo:Settlement".into(), "dbo:Place".into()],
        }]);
        let out = String::from_utf8(render("t1", &annotation).unwrap()).unwrap();
        assert_eq!(out, "\"t1\",\"1\",\"dbo:City dbo:Settlement dbo:Place\"\n");
    }

    #[test]
    fn test_render_relations() {
        let annotation = TableAnnotation::Relations(vec![RelationEdge {
            head_column: 0,
            tail_column: 2,
            relation_uri: "dbo:country".into(),
            support_count: 4,
        }]);
        let out = String::from_utf8(render("t1", &annotation).unwrap()).unwrap();
        assert_eq!(out, "\"t1\",\"0\",\"2\",\"dbo:country\"\n");
    }

    #[test]
    fn test_write_and_record_error() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::create(&config(&dir), TaskKind::ColumnType).unwrap();
        assert!(writer.results_dir().is_dir());

        let annotation = TableAnnotation::Columns(vec![]);
        let path = writer.write("t1", &annotation).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");

        writer.record_error("t2").unwrap();
        writer.record_error("t3").unwrap();
        assert_eq!(fs::read_to_string(writer.errors_path()).unwrap(), "t2\nt3\n");
    }

    #[test]
    fn test_create_truncates_error_list() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);

        let first = ResultWriter::create(&cfg, TaskKind::CellEntity).unwrap();
        first.record_error("old").unwrap();

        let second = ResultWriter::create(&cfg, TaskKind::CellEntity).unwrap();
        assert_eq!(fs::read_to_string(second.errors_path()).unwrap(), "");
    }
}
