use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use ship_model::{DiagnosticCode, Severity};

use crate::types::{FileReport, IngestReport};

/// Example row indices shown per diagnostic group.
const MAX_EXAMPLE_ROWS: usize = 5;

pub fn print_summary(report: &IngestReport) {
    println!("Profile: {}", report.profile);
    if report.dry_run {
        println!("Dry run: no files written");
    }
    println!("{}", summary_table(report));
    let issues = issue_table(report);
    if let Some(table) = issues {
        println!();
        println!("Diagnostics:");
        println!("{table}");
    }
    let failures: Vec<&FileReport> = report.files.iter().filter(|file| file.failed()).collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for file in failures {
            if let Err(error) = &file.result {
                eprintln!("- {}: {error}", file.path.display());
            }
        }
    }
}

pub fn summary_table(report: &IngestReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Mapped"),
        header_cell("Rows"),
        header_cell("Accepted"),
        header_cell("Rejected"),
        header_cell("Warned"),
        header_cell("Outputs"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 6, CellAlignment::Center);

    for file in &report.files {
        let name = Cell::new(file.path.display()).add_attribute(Attribute::Bold);
        match &file.result {
            Ok(result) => {
                let mapping = &result.mapping;
                let fields = mapping.assignments.len() + mapping.unmapped_fields.len();
                let summary = &result.summary;
                table.add_row(vec![
                    name,
                    Cell::new(format!("{}/{fields}", mapping.assignments.len())),
                    Cell::new(summary.total_rows),
                    Cell::new(summary.accepted).fg(Color::Green),
                    count_cell(summary.rejected, Color::Red),
                    count_cell(summary.warned, Color::Yellow),
                    outputs_cell(file.outputs.len()),
                ]);
            }
            Err(_) => {
                table.add_row(vec![
                    name,
                    Cell::new("FAILED")
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                ]);
            }
        }
    }

    let totals = report.totals();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(totals.total_rows).add_attribute(Attribute::Bold),
        Cell::new(totals.accepted)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        count_cell(totals.rejected, Color::Red).add_attribute(Attribute::Bold),
        count_cell(totals.warned, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

#[derive(Default)]
struct IssueGroup {
    count: usize,
    message: String,
    rows: Vec<usize>,
}

type IssueKey = (String, Severity, DiagnosticCode, String);

/// Diagnostics grouped by file, severity, code and field; errors first.
pub fn issue_table(report: &IngestReport) -> Option<Table> {
    let mut groups: BTreeMap<IssueKey, IssueGroup> = BTreeMap::new();
    for file in &report.files {
        let Ok(result) = &file.result else {
            continue;
        };
        let name = file.path.display().to_string();
        for diagnostic in &result.diagnostics {
            let key = (
                name.clone(),
                diagnostic.severity,
                diagnostic.code,
                diagnostic.field.clone().unwrap_or_default(),
            );
            let group = groups.entry(key).or_default();
            if group.count == 0 {
                group.message.clone_from(&diagnostic.message);
            }
            group.count += 1;
            if let Some(row) = diagnostic.row
                && group.rows.len() < MAX_EXAMPLE_ROWS
            {
                group.rows.push(row);
            }
        }
    }
    if groups.is_empty() {
        return None;
    }

    let mut ordered: Vec<(IssueKey, IssueGroup)> = groups.into_iter().collect();
    ordered.sort_by(|(a, _), (b, _)| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.2.cmp(&b.2))
            .then_with(|| a.3.cmp(&b.3))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Code"),
        header_cell("Count"),
        header_cell("Message"),
        header_cell("Rows"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for ((file, severity, code, field), group) in ordered {
        let field_cell = if field.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(field)
        };
        let rows_cell = if group.rows.is_empty() {
            dim_cell("-")
        } else {
            let mut rows: Vec<String> = group.rows.iter().map(usize::to_string).collect();
            if group.count > group.rows.len() {
                rows.push("...".to_string());
            }
            Cell::new(rows.join(", "))
        };
        table.add_row(vec![
            Cell::new(file),
            severity_cell(severity),
            field_cell,
            Cell::new(code.as_str()),
            Cell::new(group.count).fg(severity_color(severity)),
            Cell::new(group.message),
            rows_cell,
        ]);
    }
    Some(table)
}

fn outputs_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
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
