//! Dashboard scenarios over a small fixed table.

use chrono::{NaiveDate, Weekday};
use sales_model::{
    AggregateRow, DashboardOptions, DashboardSummary, FilterSelection, SalesRecord, SalesTable,
};
use sales_transform::{apply_filter, sales_by_segment, summarize, totals, year_over_year};

fn record(year: i32, segment: &str, dollars: f64) -> SalesRecord {
    SalesRecord::new(
        NaiveDate::from_ymd_opt(year, 6, 15).unwrap(),
        segment,
        format!("{segment} customer"),
        dollars,
    )
}

fn table() -> SalesTable {
    SalesTable::from_records(
        "sales",
        vec![
            record(2022, "Online", 100.0),
            record(2022, "Vending", 50.0),
            record(2023, "Online", 200.0),
            record(2023, "Vending", 0.0),
        ],
    )
}

#[test]
fn one_year_one_segment() {
    let table = table();
    let subset = apply_filter(&table, &FilterSelection::new([2023], ["Online"]));

    assert_eq!(subset.len(), 1);
    assert_eq!(totals(&subset).dollars, 200.0);
    assert_eq!(
        sales_by_segment(&subset),
        vec![AggregateRow::new("Online".to_string(), 200.0)]
    );
}

#[test]
fn no_segments_selected() {
    let table = table();
    let selection = FilterSelection::new([2022, 2023], Vec::<String>::new());
    let subset = apply_filter(&table, &selection);

    assert!(subset.is_empty());
    assert_eq!(totals(&subset).dollars, 0.0);
    assert!(sales_by_segment(&subset).is_empty());
}

#[test]
fn default_selection_covers_the_table() {
    let table = table();
    let selection = FilterSelection::all(&table);
    assert_eq!(selection.years.len(), 2);
    assert_eq!(selection.segments.len(), 2);

    let summary = summarize(&apply_filter(&table, &selection), &DashboardOptions::default());
    assert_eq!(summary.totals.dollars, 350.0);
    assert_eq!(summary.totals.row_count, 4);
    // Mid-June 2022 to mid-June 2023, one row per week.
    assert_eq!(summary.weekly_sales.len(), 53);
}

#[test]
fn year_over_year_for_a_segment() {
    let table = table();
    let vending = year_over_year(&table, Some("Vending"), 2022, 2023);
    assert_eq!(vending.delta, -50.0);
    assert_eq!(vending.percent_delta, Some(-100.0));

    let online = year_over_year(&table, Some("Online"), 2021, 2022);
    assert_eq!(online.prior, 0.0);
    assert_eq!(online.percent_delta, None);
}

#[test]
fn summary_serializes_round_trip() {
    let table = table();
    let options = DashboardOptions::default().with_week_start(Weekday::Sun);
    let summary = summarize(&apply_filter(&table, &FilterSelection::all(&table)), &options);

    let json = serde_json::to_string(&summary).unwrap();
    let decoded: DashboardSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, summary);
}
