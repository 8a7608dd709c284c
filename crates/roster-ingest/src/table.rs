//! CSV tables and column sampling.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use roster_model::ColumnSample;
use tracing::debug;

use crate::error::{IngestError, Result};

const BOM: char = '\u{feff}';
const READER_ORIGIN: &str = "input";

/// Headers plus data rows of one delimited file.
///
/// Rows may be ragged: missing cells read as blank, extra cells are kept
/// but never addressed by a header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based source line each row starts on. Quoted cells may span lines.
    pub lines: Vec<usize>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Source line of data row `row`, assuming one line per row when the
    /// reader recorded no position.
    pub fn line(&self, row: usize) -> usize {
        self.lines.get(row).copied().unwrap_or(row + 2)
    }

    /// Cell at `row`/`column`, blank when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }

    /// One sample per header position with at most `limit` values each.
    pub fn column_samples(&self, limit: usize) -> Vec<ColumnSample> {
        self.headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let values = (0..self.rows.len().min(limit))
                    .map(|row| self.cell(row, column).to_string())
                    .collect();
                ColumnSample::new(header.clone(), values)
            })
            .collect()
    }
}

/// Reads the header row and every data row.
pub fn read_csv_table<R: Read>(reader: R) -> Result<CsvTable> {
    read_records(reader, READER_ORIGIN, None)
}

/// Reads the header row and at most `sample_size` data rows.
pub fn read_csv_preview<R: Read>(reader: R, sample_size: usize) -> Result<CsvTable> {
    read_records(reader, READER_ORIGIN, Some(sample_size))
}

pub fn read_csv_table_path(path: &Path) -> Result<CsvTable> {
    read_records(open(path)?, &path.display().to_string(), None)
}

pub fn read_csv_preview_path(path: &Path, sample_size: usize) -> Result<CsvTable> {
    read_records(open(path)?, &path.display().to_string(), Some(sample_size))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn read_records<R: Read>(reader: R, origin: &str, limit: Option<usize>) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::csv(origin, &e))?
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let header = if idx == 0 {
                header.trim_start_matches(BOM)
            } else {
                header
            };
            header.trim().to_string()
        })
        .collect();

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    for record in reader.records() {
        if limit.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
        let record = record.map_err(|e| IngestError::csv(origin, &e))?;
        let line = record
            .position()
            .and_then(|position| usize::try_from(position.line()).ok())
            .unwrap_or(rows.len() + 2);
        lines.push(line);
        rows.push(record.iter().map(|value| value.trim().to_string()).collect());
    }

    debug!(origin, columns = headers.len(), rows = rows.len(), "read csv");
    Ok(CsvTable {
        headers,
        rows,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bom_and_trims() {
        let table = read_csv_table("\u{feff}Имя , x\n Иван ,12.5\n".as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Имя", "x"]);
        assert_eq!(table.rows, vec![vec!["Иван".to_string(), "12.5".to_string()]]);
    }

    #[test]
    fn test_ragged_rows_read_blank() {
        let table = read_csv_table("a,b,c\n1\n1,2,3,4\n".as_bytes()).unwrap();
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(1, 2), "3");
        assert_eq!(table.cell(9, 0), "");
    }

    #[test]
    fn test_lines_follow_multiline_cells() {
        let table = read_csv_table("a,b\n\"one\ntwo\",1\nx,2\n".as_bytes()).unwrap();
        assert_eq!(table.cell(0, 0), "one\ntwo");
        assert_eq!(table.line(0), 2);
        assert_eq!(table.line(1), 4);
        assert_eq!(CsvTable::default().line(0), 2);
    }

    #[test]
    fn test_preview_stops_early() {
        let table = read_csv_preview("h\n1\n2\n3\n4\n".as_bytes(), 2).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let table = read_csv_table("".as_bytes()).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_column_samples_follow_header_positions() {
        let table = read_csv_table("a,b\n1,x\n2,y\n3,z\n".as_bytes()).unwrap();
        let samples = table.column_samples(2);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].header, "b");
        assert_eq!(samples[1].values, vec!["x", "y"]);
    }
}
