use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recon_cli::pipeline::PipelineResult;
use recon_model::{StatsSummary, month_name};

pub fn print_summary(result: &PipelineResult) {
    let outcome = &result.outcome;
    println!("Output: {}", result.output_dir.display());
    println!("Report: {}", result.report_path.display());
    println!(
        "Patients: {} matched, {} only in source, {} only in registry, {} skipped",
        outcome.identity.common.len(),
        outcome.identity.only_in_source.len(),
        outcome.identity.only_in_target.len(),
        outcome.skipped_identities,
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Scope"),
        header_cell("Compared"),
        header_cell("Match"),
        header_cell("Mismatch"),
        header_cell("Missing src"),
        header_cell("Missing tgt"),
        header_cell("Match %"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (month, stats) in &outcome.monthly {
        add_stats_row(&mut table, Cell::new(month_name(*month)), stats, false);
    }
    add_stats_row(
        &mut table,
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        &outcome.overall,
        true,
    );
    println!("{table}");
}

fn add_stats_row(table: &mut Table, label: Cell, stats: &StatsSummary, bold: bool) {
    let mut row = vec![
        label,
        Cell::new(stats.total_compared),
        Cell::new(stats.matches).fg(Color::Green),
        count_cell(stats.mismatches, Color::Red),
        count_cell(stats.missing_in_source, Color::Yellow),
        count_cell(stats.missing_in_target, Color::Yellow),
        Cell::new(format!("{:.2}", stats.match_percent)),
    ];
    if bold {
        row = row
            .into_iter()
            .map(|cell| cell.add_attribute(Attribute::Bold))
            .collect();
    }
    table.add_row(row);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(value: u64, color: Color) -> Cell {
    if value > 0 {
        Cell::new(value).fg(color)
    } else {
        Cell::new(value).fg(Color::DarkGrey)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
