use std::io::Write;

use roster_ingest::{IngestError, read_csv_preview_path, read_csv_table_path};
use tempfile::NamedTempFile;

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn reads_utf8_file_with_quoted_cells() {
    let file = write_file("Имя,Саундтрек\n\"Иванов, Иван\",\"Song \"\"A\"\"\"\n");
    let table = read_csv_table_path(file.path()).unwrap();
    assert_eq!(table.headers, vec!["Имя", "Саундтрек"]);
    assert_eq!(table.cell(0, 0), "Иванов, Иван");
    assert_eq!(table.cell(0, 1), "Song \"A\"");
}

#[test]
fn preview_reads_only_requested_rows() {
    let mut contents = String::from("speed\n");
    for i in 0..500 {
        contents.push_str(&format!("{i}\n"));
    }
    let file = write_file(&contents);
    let table = read_csv_preview_path(file.path(), 50).unwrap();
    assert_eq!(table.row_count(), 50);
    assert_eq!(table.column_samples(50)[0].values.len(), 50);
}

#[test]
fn missing_file_reports_path() {
    let err = read_csv_table_path(std::path::Path::new("/definitely/not/here.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
    assert!(err.to_string().contains("/definitely/not/here.csv"));
}

#[test]
fn invalid_utf8_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"name\n\xff\xfe\n").unwrap();
    file.flush().unwrap();
    let err = read_csv_table_path(file.path()).unwrap_err();
    assert!(matches!(err, IngestError::CsvParse { .. }));
}
