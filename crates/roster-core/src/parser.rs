//! Row parsing: confirmed mappings plus raw rows into validated records.

use chrono::NaiveDate;
use roster_ingest::CsvTable;
use roster_model::{ConfirmedMappings, HumanDraft, TargetField};
use roster_validate::validate;
use tracing::trace;

use crate::error::{ImportError, Result};
use crate::uniqueness::ParsedRow;

/// Column positions resolved to their confirmed target fields.
fn resolve_columns(table: &CsvTable, confirmed: &ConfirmedMappings) -> Vec<Option<TargetField>> {
    table
        .headers
        .iter()
        .map(|header| confirmed.get(header).and_then(|target| target.field()))
        .collect()
}

/// Parses and validates every data row.
///
/// The first failing row aborts the whole parse: a cell that cannot be
/// coerced yields [`ImportError::RowFormat`], a record that breaks a
/// field constraint yields [`ImportError::SchemaValidation`].
pub fn parse_rows(
    table: &CsvTable,
    confirmed: &ConfirmedMappings,
    creation_date: NaiveDate,
) -> Result<Vec<ParsedRow>> {
    let columns = resolve_columns(table, confirmed);
    let mut parsed = Vec::with_capacity(table.row_count());

    for index in 0..table.row_count() {
        let row = table.line(index);
        let mut draft = HumanDraft::default();

        for (column, field) in columns.iter().enumerate() {
            let Some(field) = field else {
                continue;
            };
            let value = table.cell(index, column);
            if value.trim().is_empty() {
                continue;
            }
            draft
                .set_raw(*field, value)
                .map_err(|_| ImportError::RowFormat {
                    row,
                    column: table.headers[column].clone(),
                    value: value.to_string(),
                    field: *field,
                })?;
        }

        let record = validate(&draft, creation_date)
            .map_err(|violations| ImportError::SchemaValidation { row, violations })?;
        trace!(row, "row parsed");
        parsed.push(ParsedRow { row, record });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_ingest::read_csv_table;
    use roster_model::{Mood, parse_confirmed};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    fn confirmed() -> ConfirmedMappings {
        parse_confirmed([
            ("Имя", "name"),
            ("Герой", "realHero"),
            ("Скорость", "impactSpeed"),
            ("Трек", "soundtrackName"),
            ("X", "coordinates.x"),
            ("Настроение", "mood"),
            ("Мусор", "none"),
        ])
        .unwrap()
    }

    #[test]
    fn test_parses_localized_tokens() {
        let table = read_csv_table(
            "Имя,Герой,Скорость,Трек,X,Настроение,Мусор\nИван,да,10,Song,\"12,5\",гнев,???\n"
                .as_bytes(),
        )
        .unwrap();
        let rows = parse_rows(&table, &confirmed(), date()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 2);
        let record = &rows[0].record;
        assert!(record.real_hero);
        assert_eq!(record.mood, Some(Mood::Rage));
        assert!((record.coordinates.x - 12.5).abs() < f32::EPSILON);
        assert_eq!(record.creation_date, date());
        assert!(record.car.is_none());
    }

    #[test]
    fn test_blank_optional_cells_keep_defaults() {
        let table = read_csv_table(
            "Имя,Герой,Скорость,Трек,X,Настроение\nИван,нет,10,Song,1,\n".as_bytes(),
        )
        .unwrap();
        let rows = parse_rows(&table, &confirmed(), date()).unwrap();
        assert_eq!(rows[0].record.mood, None);
    }

    #[test]
    fn test_bad_cell_is_row_and_column_qualified() {
        let table = read_csv_table(
            "Имя,Герой,Скорость,Трек,X\nИван,да,10,Song,1\nОля,может,10,Song,1\n".as_bytes(),
        )
        .unwrap();
        let err = parse_rows(&table, &confirmed(), date()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Data conversion error at row 3, column 'Герой': invalid value 'может' for field realHero"
        );
    }

    #[test]
    fn test_row_numbers_count_physical_lines() {
        let table = read_csv_table(
            "Имя,Герой,Скорость,Трек,X\n\"Иван\nПетров\",да,10,Song,1\nОля,да,fast,Song,1\n"
                .as_bytes(),
        )
        .unwrap();
        let err = parse_rows(&table, &confirmed(), date()).unwrap_err();
        assert!(matches!(err, ImportError::RowFormat { row: 4, .. }));
    }

    #[test]
    fn test_unmapped_headers_are_ignored() {
        let table = read_csv_table(
            "Имя,Герой,Скорость,Трек,X,Unknown\nИван,да,10,Song,1,zzz\n".as_bytes(),
        )
        .unwrap();
        assert!(parse_rows(&table, &confirmed(), date()).is_ok());
    }
}
