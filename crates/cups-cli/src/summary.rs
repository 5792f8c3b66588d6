use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cups_model::EquivalenceRecord;

use crate::commands::ImportOutcome;

pub fn print_record(record: &EquivalenceRecord) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("Principal"), Cell::new(&record.principal_code)]);
    table.add_row(vec![
        header_cell("Description"),
        Cell::new(&record.description),
    ]);
    table.add_row(vec![
        header_cell("Variants"),
        Cell::new(join(record.variants.iter())),
    ]);
    table.add_row(vec![
        header_cell("Sources"),
        Cell::new(join(record.sources.iter())),
    ]);
    table.add_row(vec![header_cell("Active"), flag_cell(record.active)]);
    table.add_row(vec![
        header_cell("Updated"),
        dim_cell(record.updated_at.format("%Y-%m-%d %H:%M:%S UTC")),
    ]);
    println!("{table}");
}

pub fn print_record_list(records: &[&EquivalenceRecord]) {
    if records.is_empty() {
        println!("registry is empty");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Principal"),
        header_cell("Description"),
        header_cell("Variants"),
        header_cell("Sources"),
        header_cell("Active"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.principal_code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&record.description),
            Cell::new(record.variants.len()),
            Cell::new(join(record.sources.iter())),
            flag_cell(record.active),
        ]);
    }
    println!("{table}");
    println!("{} record(s)", records.len());
}

pub fn print_import_summary(outcome: &ImportOutcome) {
    println!("Catalog: {}", outcome.source);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Created"),
        header_cell("Merged"),
        header_cell("Skipped"),
    ]);
    apply_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(outcome.created)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Cell::new(outcome.merged),
        count_cell(outcome.skipped, Color::Yellow),
    ]);
    println!("{table}");
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(active: bool) -> Cell {
    if active {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::DarkGrey)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn join<'a, I>(values: I) -> String
where
    I: Iterator<Item = &'a String>,
{
    values
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
