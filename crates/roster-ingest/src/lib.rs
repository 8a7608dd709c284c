//! Import file ingestion.

pub mod error;
pub mod table;

pub use error::{IngestError, Result};
pub use table::{
    CsvTable, read_csv_preview, read_csv_preview_path, read_csv_table, read_csv_table_path,
};
