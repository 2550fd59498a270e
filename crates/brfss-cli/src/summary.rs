use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use brfss_cli::types::{RunResult, SkipReason, YearOutcome, YearReport};
use brfss_map::AliasMatch;
use brfss_model::{DiagnosticEvent, ImputationSource, SchemaEntry};
use brfss_standards::SchemaRegistry;

pub fn print_summary(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Imputed"),
        header_cell("Gaps"),
        header_cell("Warnings"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_rows = 0usize;
    for report in &result.years {
        let (rows, imputed, gaps) = match &report.outcome {
            YearOutcome::Done {
                rows,
                imputations,
                gaps,
                ..
            } => {
                total_rows += rows.unwrap_or(0);
                (*rows, Some(*imputations), Some(gaps.len()))
            }
            _ => (None, None, None),
        };
        table.add_row(vec![
            Cell::new(report.year)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            status_cell(&report.outcome),
            rows.map_or_else(|| dim_cell("-"), Cell::new),
            imputed.map_or_else(|| dim_cell("-"), Cell::new),
            count_cell(gaps, Color::Red),
            count_cell(Some(report.diagnostics.warning_count()), Color::Yellow),
            detail_cell(&report.outcome),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{}/{} done", result.done_count(), result.years.len())),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_imputation_table(&result.years);
}

/// Every imputation decision and unresolved gap of the run.
fn print_imputation_table(reports: &[YearReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Source"),
        header_cell("Value"),
        header_cell("Filled"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut rows = 0usize;
    for report in reports {
        for event in report.diagnostics.events() {
            let row = match event {
                DiagnosticEvent::Imputed(record) => vec![
                    Cell::new(report.year),
                    Cell::new(&record.column),
                    Cell::new(record.kind),
                    source_cell(record.source),
                    Cell::new(record.value),
                    Cell::new(record.filled),
                ],
                DiagnosticEvent::Gap(gap) => vec![
                    Cell::new(report.year),
                    Cell::new(&gap.column).fg(Color::Red),
                    Cell::new(gap.kind),
                    Cell::new("none").fg(Color::Red).add_attribute(Attribute::Bold),
                    dim_cell("-"),
                    Cell::new(gap.missing).fg(Color::Red),
                ],
                _ => continue,
            };
            table.add_row(row);
            rows += 1;
        }
    }
    if rows == 0 {
        return;
    }
    println!();
    println!("Imputation:");
    println!("{table}");
}

pub fn print_registry(registry: &SchemaRegistry) {
    println!("Registry: {}", registry.name());
    if let Some(description) = registry.description() {
        println!("{description}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Binary"),
        header_cell("Raw names"),
    ]);
    apply_table_style(&mut table);
    for entry in registry.entries() {
        table.add_row(vec![
            Cell::new(&entry.canonical_name).add_attribute(Attribute::Bold),
            Cell::new(entry.kind),
            entry
                .binary
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(raw_names_label(entry)),
        ]);
    }
    println!("{table}");
}

pub fn print_matches(matches: &[AliasMatch]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Alias"),
        header_cell("Suggested"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for row in matches {
        let suggested = match &row.suggested {
            Some(column) if row.is_exact() => Cell::new(column).fg(Color::Green),
            Some(column) => Cell::new(column).fg(Color::Yellow),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(row.year),
            Cell::new(&row.alias),
            suggested,
            row.score
                .map_or_else(|| dim_cell("-"), |score| Cell::new(format!("{score:.2}"))),
        ]);
    }
    println!("{table}");
}

fn raw_names_label(entry: &SchemaEntry) -> String {
    let mut names: Vec<String> = entry.aliases.clone();
    for alias in &entry.target_aliases {
        let window = match (alias.from, alias.to) {
            (Some(from), Some(to)) => format!(" ({from}-{to})"),
            (Some(from), None) => format!(" ({from}-)"),
            (None, Some(to)) => format!(" (-{to})"),
            (None, None) => String::new(),
        };
        names.push(format!("{}{window}", alias.name));
    }
    let mut label = names.join(", ");
    if let Some(divisor) = entry.divide_by {
        label.push_str(&format!(" / {divisor}"));
    }
    label
}

fn status_cell(outcome: &YearOutcome) -> Cell {
    let label = outcome.label();
    match outcome {
        YearOutcome::Done {
            checkpoint: true, ..
        } => dim_cell(label),
        YearOutcome::Done { gaps, .. } if !gaps.is_empty() => Cell::new(label).fg(Color::Yellow),
        YearOutcome::Done { .. } => Cell::new(label)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        YearOutcome::Skipped { .. } => Cell::new(label).fg(Color::DarkGrey),
        YearOutcome::Failed { .. } => Cell::new(label)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn detail_cell(outcome: &YearOutcome) -> Cell {
    match outcome {
        YearOutcome::Skipped {
            reason: SkipReason::NotFound { .. },
        } => dim_cell("archive not published"),
        YearOutcome::Skipped {
            reason: SkipReason::Transport { message, .. },
        } => Cell::new(format!("download failed: {message}")).fg(Color::Yellow),
        YearOutcome::Failed { error } => Cell::new(error.to_string()).fg(Color::Red),
        YearOutcome::Done { gaps, .. } if !gaps.is_empty() => {
            let columns: Vec<&str> = gaps.iter().map(|gap| gap.column.as_str()).collect();
            Cell::new(format!("not imputed: {}", columns.join(", "))).fg(Color::Yellow)
        }
        YearOutcome::Done { .. } => dim_cell("-"),
    }
}

fn source_cell(source: ImputationSource) -> Cell {
    match source {
        ImputationSource::CarriedMode => Cell::new(source.as_str()).fg(Color::Yellow),
        _ => Cell::new(source.as_str()),
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
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

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
