//! Source tables and the task manifest.
//!
//! Tables are CSV files without header handling: row 0 holds the header
//! cells and data rows start at 1, matching the row numbers used by the
//! manifest and the result files.

mod error;
mod manifest;

pub use error::TableError;
pub use manifest::TaskManifest;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::text::clean_cell;

/// Cleaned keywords of one row, `(column, keyword)` in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowKeywords {
    pub row: usize,
    pub cells: Vec<(usize, String)>,
}

/// An in-memory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// File stem, used as the table name in results.
    pub name: String,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Read a table file; the name is the file stem.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = File::open(path).map_err(|e| TableError::io(path, e))?;

        Self::from_reader(name, file).map_err(|e| match e {
            TableError::Csv { message, .. } => TableError::Csv {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse CSV from any reader. Ragged rows are accepted.
    pub fn from_reader(name: impl Into<String>, reader: impl Read) -> Result<Self, TableError> {
        let name = name.into();
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .escape(Some(b'\\'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record.map_err(|e| TableError::csv(&name, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        if rows.is_empty() {
            return Err(TableError::Empty(name));
        }

        Ok(Self { name, rows })
    }

    /// Raw cell value.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Widest row.
    pub fn num_columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Search keywords for the given rows and columns.
    ///
    /// Rows and columns outside the table are skipped, as are cells that
    /// clean to nothing. Rows left without keywords are dropped.
    pub fn keywords(&self, rows: &[usize], columns: &[usize]) -> Vec<RowKeywords> {
        rows.iter()
            .filter_map(|&row| {
                let cells: Vec<(usize, String)> = columns
                    .iter()
                    .filter_map(|&column| {
                        self.cell(row, column)
                            .and_then(clean_cell)
                            .map(|keyword| (column, keyword))
                    })
                    .collect();

                if cells.is_empty() {
                    None
                } else {
                    Some(RowKeywords { row, cells })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: &str = "City,Country,Population\n\
                          Paris,France,2148000\n\
                          \"Springfield (Illinois)\",USA,116250\n\
                          Lyon,,513275\n\
                          1999,2000\n";

    #[test]
    fn test_parse_without_headers() {
        let table = Table::from_reader("cities", CITIES.as_bytes()).unwrap();
        assert_eq!(table.num_rows(), 5);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.cell(0, 0), Some("City"));
        assert_eq!(table.cell(1, 1), Some("France"));
        assert_eq!(table.cell(4, 2), None);
    }

    #[test]
    fn test_keywords_clean_and_skip() {
        let table = Table::from_reader("cities", CITIES.as_bytes()).unwrap();
        let keywords = table.keywords(&[1, 2, 3, 4, 99], &[0, 1, 2, 7]);

        assert_eq!(keywords.len(), 3);
        assert_eq!(
            keywords[0],
            RowKeywords {
                row: 1,
                cells: vec![(0, "Paris".to_string()), (1, "France".to_string())],
            }
        );
        assert_eq!(keywords[1].cells[0], (0, "Springfield".to_string()));
        assert_eq!(keywords[2].cells, vec![(0, "Lyon".to_string())]);
    }

    #[test]
    fn test_empty_table() {
        let err = Table::from_reader("empty", "".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Empty(name) if name == "empty"));
    }
}
