use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use polars::prelude::{AnyValue, DataFrame};

use sales_model::{AggregateRow, ParentSegmentKey, Totals, WeeklyTotal, YearOverYear};

use crate::types::{DatasetInfo, ExportOutcome, OptionsReport, RowsPreview, SummaryReport, YoyReport};

pub fn print_summary(report: &SummaryReport) {
    print_dataset(&report.dataset);
    let summary = &report.summary;
    println!("{}", kpi_table(&summary.totals));
    println!("{} rows", thousands(summary.totals.row_count as u64));

    if summary.totals.row_count == 0 {
        println!();
        println!("No rows match the selected years and segments.");
        return;
    }

    println!();
    println!("Sales by segment:");
    println!("{}", ranked_table("Segment", &summary.sales_by_segment));

    println!();
    println!("Weekly sales:");
    println!("{}", weekly_table(&summary.weekly_sales));

    println!();
    println!("Top {} distributors:", summary.top_distributors.len());
    println!("{}", ranked_table("Customer", &summary.top_distributors));

    println!();
    println!("Top {} parent customers:", summary.top_parents.len());
    println!("{}", parent_table(&summary.top_parents));
}

pub fn print_options(report: &OptionsReport) {
    print_dataset(&report.dataset);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Filter"), header_cell("Values")]);
    apply_table_style(&mut table);
    let years: Vec<String> = report.options.years.iter().map(ToString::to_string).collect();
    table.add_row(vec![Cell::new("Year"), Cell::new(years.join(", "))]);
    table.add_row(vec![
        Cell::new("Market segment"),
        Cell::new(report.options.segments.join(", ")),
    ]);
    println!("{table}");
}

pub fn print_rows(preview: &RowsPreview) {
    print_dataset(&preview.dataset);
    println!("{}", frame_table(&preview.frame));
    let shown = preview.frame.height();
    if shown < preview.matched {
        println!(
            "{} of {} rows",
            thousands(shown as u64),
            thousands(preview.matched as u64)
        );
    } else {
        println!("{} rows", thousands(preview.matched as u64));
    }
}

pub fn print_export(outcome: &ExportOutcome) {
    if let ExportOutcome::Written { path, rows } = outcome {
        println!("Exported {} rows to {}", thousands(*rows as u64), path.display());
    }
}

pub fn print_yoy(report: &YoyReport) {
    print_dataset(&report.dataset);
    let comparison = &report.comparison;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Segment"),
        header_cell(&comparison.prior_year.to_string()),
        header_cell(&comparison.current_year.to_string()),
        header_cell("Change"),
        header_cell("Change %"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(comparison.segment.as_deref().unwrap_or("All segments")),
        Cell::new(money(comparison.prior)),
        Cell::new(money(comparison.current)),
        delta_cell(comparison.delta, money(comparison.delta)),
        percent_cell(comparison),
    ]);
    println!("{table}");
}

fn print_dataset(info: &DatasetInfo) {
    println!("Dataset: {}", info.dataset);
    println!("Source: {}", info.source);
    println!("Profile: {} ({} rows)", info.profile, thousands(info.rows as u64));
}

fn kpi_table(totals: &Totals) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Total Sales"),
        header_cell("Total Cases Received"),
        header_cell("Total Cases Ordered"),
        header_cell("Average Sale"),
        header_cell("Customers"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Center);
    }
    table.add_row(vec![
        Cell::new(kpi_dollars(totals.dollars)).add_attribute(Attribute::Bold),
        count_cell(totals.qty_received),
        count_cell(totals.qty_ordered),
        Cell::new(money(totals.mean_dollars)),
        count_cell(totals.distinct_customers as u64),
    ]);
    table
}

fn ranked_table(label: &str, rows: &[AggregateRow<String>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell(label), header_cell("Dollars")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (rank, row) in rows.iter().enumerate() {
        table.add_row(vec![
            dim_cell(rank + 1),
            Cell::new(&row.key),
            delta_cell(row.value, money(row.value)),
        ]);
    }
    table
}

fn parent_table(rows: &[AggregateRow<ParentSegmentKey>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Parent Customer"),
        header_cell("Segment"),
        header_cell("Dollars"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (rank, row) in rows.iter().enumerate() {
        let parent = match row.key.parent.as_deref() {
            Some(name) => Cell::new(name),
            None => dim_cell(&row.key.parent),
        };
        table.add_row(vec![
            dim_cell(rank + 1),
            parent,
            Cell::new(&row.key.segment),
            delta_cell(row.value, money(row.value)),
        ]);
    }
    table
}

fn weekly_table(weeks: &[WeeklyTotal]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Week of"), header_cell("Dollars")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for week in weeks {
        let dollars = if week.dollars == 0.0 {
            dim_cell(money(week.dollars))
        } else {
            delta_cell(week.dollars, money(week.dollars))
        };
        table.add_row(vec![
            Cell::new(week.week_start.format("%Y-%m-%d")),
            dollars,
        ]);
    }
    table
}

fn frame_table(frame: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_header(
        frame
            .get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str())),
    );
    apply_table_style(&mut table);
    let columns = frame.get_columns();
    for row in 0..frame.height() {
        table.add_row(columns.iter().map(|column| {
            let value = column.get(row).unwrap_or(AnyValue::Null);
            match value {
                AnyValue::Null => dim_cell("-"),
                AnyValue::Float64(dollars) => {
                    Cell::new(money(dollars)).set_alignment(CellAlignment::Right)
                }
                AnyValue::UInt64(count) => {
                    Cell::new(thousands(count)).set_alignment(CellAlignment::Right)
                }
                AnyValue::String(text) => Cell::new(text),
                AnyValue::StringOwned(text) => Cell::new(text.as_str()),
                other => Cell::new(other.to_string()),
            }
        }));
    }
    table
}

fn percent_cell(comparison: &YearOverYear) -> Cell {
    match comparison.percent_delta {
        Some(percent) => delta_cell(percent, format!("{percent:+.1}%")),
        None => dim_cell("n/a"),
    }
}

fn delta_cell(value: f64, text: String) -> Cell {
    if value < 0.0 {
        Cell::new(text).fg(Color::Red)
    } else {
        Cell::new(text)
    }
}

fn count_cell(count: u64) -> Cell {
    if count > 0 {
        Cell::new(thousands(count)).add_attribute(Attribute::Bold)
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
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

/// KPI card text: whole dollars, `US $ 1,234`.
fn kpi_dollars(value: f64) -> String {
    let whole = value.trunc();
    let sign = if whole < 0.0 { "-" } else { "" };
    format!("US $ {sign}{}", thousands(whole.abs() as u64))
}

/// `1,234.57` with the sign kept.
fn money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", thousands(cents / 100), cents % 100)
}

fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
