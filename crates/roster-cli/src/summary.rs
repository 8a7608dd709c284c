use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use roster_core::ImportOutcome;
use roster_map::FieldScore;
use roster_model::{
    FieldCatalog, ImportJob, ImportStatus, LearnedMapping, MappingTarget, SuggestionSource,
};
use roster_cli::workspace::ColumnReport;

pub fn print_fields(catalog: FieldCatalog) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Kind")]);
    apply_table_style(&mut table);
    for field in catalog.fields() {
        table.add_row(vec![Cell::new(field.as_str()), Cell::new(field.kind().label())]);
    }
    println!("Field catalog v{}", catalog.version());
    println!("{table}");
}

pub fn print_suggestions(reports: &[ColumnReport], explain: bool, top: usize) {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("Header"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Source"),
    ];
    if explain {
        header.push(header_cell("Ranking"));
    }
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for report in reports {
        let suggestion = &report.suggestion;
        let mut row = vec![
            Cell::new(&suggestion.header),
            target_cell(suggestion.target),
            Cell::new(format!("{:.2}", suggestion.confidence)),
            source_cell(suggestion.source),
        ];
        if explain {
            row.push(Cell::new(ranking_text(&report.ranking, top)));
        }
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_import(outcome: &ImportOutcome) {
    println!(
        "Import job {} committed {} record(s).",
        outcome.job_id,
        outcome.added.len()
    );
    if outcome.added.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Soundtrack"),
        header_cell("Hero"),
        header_cell("Speed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for stored in &outcome.added {
        let human = &stored.human;
        table.add_row(vec![
            Cell::new(stored.id.0),
            Cell::new(&human.name),
            Cell::new(&human.soundtrack_name),
            Cell::new(if human.real_hero { "yes" } else { "no" }),
            Cell::new(human.impact_speed),
        ]);
    }
    println!("{table}");
}

pub fn print_history(jobs: &[ImportJob]) {
    if jobs.is_empty() {
        println!("No imports yet.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Job"),
        header_cell("Started"),
        header_cell("Status"),
        header_cell("Added"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for job in jobs {
        table.add_row(vec![
            Cell::new(job.id),
            Cell::new(job.started_at.format("%Y-%m-%d %H:%M:%S UTC")),
            status_cell(job.status),
            job.added_count.map_or_else(|| dim_cell("-"), Cell::new),
            job.error_detail
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_learned(mappings: &[LearnedMapping]) {
    if mappings.is_empty() {
        println!("Nothing learned yet.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Field"),
        header_cell("Uses"),
        header_cell("Last used"),
        header_cell("Confidence"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for mapping in mappings {
        table.add_row(vec![
            Cell::new(&mapping.source_header),
            Cell::new(mapping.target_field),
            Cell::new(mapping.usage_count),
            Cell::new(mapping.last_used),
            Cell::new(format!("{:.2}", mapping.confidence())),
        ]);
    }
    println!("{table}");
}

fn ranking_text(ranking: &[FieldScore], top: usize) -> String {
    ranking
        .iter()
        .take(top)
        .map(|score| {
            format!(
                "{} {:.2} ({})",
                score.field,
                score.confidence,
                score.explain()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn target_cell(target: MappingTarget) -> Cell {
    match target {
        MappingTarget::Field(field) => Cell::new(field).fg(Color::Blue).add_attribute(Attribute::Bold),
        MappingTarget::Unmapped => dim_cell(target),
    }
}

fn source_cell(source: SuggestionSource) -> Cell {
    match source {
        SuggestionSource::Learned => Cell::new("learned").fg(Color::Green),
        SuggestionSource::Scored => Cell::new("scored"),
    }
}

fn status_cell(status: ImportStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        ImportStatus::Success => cell.fg(Color::Green),
        ImportStatus::Failed => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        ImportStatus::InProgress => cell.fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
