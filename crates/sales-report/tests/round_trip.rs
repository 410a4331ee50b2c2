//! Exports read back through the loader.

use chrono::NaiveDate;
use sales_ingest::{DatasetCache, SourceLocator, load_source};
use sales_model::{Field, FilterSelection, SalesRecord, SalesTable, SchemaProfile};
use sales_report::ExportPayload;
use sales_transform::apply_filter;

fn table() -> SalesTable {
    let date = |m, d| NaiveDate::from_ymd_opt(2023, m, d).unwrap();
    SalesTable::from_records(
        "dot_sales",
        vec![
            SalesRecord::new(date(1, 5), "Online", "Smith, J", 1234.567_891_234)
                .with_parent("Acme Group")
                .with_item("Chips \"XL\"")
                .with_quantities(12, 10),
            SalesRecord::new(date(2, 28), "Vending", "Bolt", -0.1),
            SalesRecord::new(date(3, 1), "Online", "Corner", 1e-7),
        ],
    )
}

#[test]
fn export_reads_back_identically() {
    let table = table();
    let subset = apply_filter(&table, &FilterSelection::all(&table));
    let payload = ExportPayload::from_subset(&subset).unwrap();

    let cache = DatasetCache::default();
    let (_, loaded) = cache
        .get_or_load_upload(&payload.file_name, &payload.bytes, None)
        .unwrap();

    assert_eq!(loaded.profile(), "canonical");
    assert_eq!(loaded.columns(), table.columns());
    assert_eq!(loaded.len(), subset.len());
    for (read, written) in loaded.records().iter().zip(subset.iter()) {
        assert_eq!(read.dollars, written.dollars);
        assert_eq!(read.invoice_date, written.invoice_date);
        assert_eq!(read.customer, written.customer);
        assert_eq!(read.item_description, written.item_description);
        assert_eq!(read.qty_received, written.qty_received.or(Some(0)));
    }
}

#[test]
fn filtered_export_of_a_loaded_csv() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("weekly.csv");
    std::fs::write(
        &source,
        "Invoice Date,Customer,Dollars,Market Segment\n\
         2022-12-30,ACME,10.25,Online\n\
         2023-01-02,Bolt,20,Vending\n\
         2023-01-03,ACME,30.5,Online\n",
    )
    .unwrap();

    let profiles = SchemaProfile::builtin();
    let table = load_source(&SourceLocator::from_path(&source), &profiles).unwrap();
    let subset = apply_filter(&table, &FilterSelection::new([2023], ["Online"]));
    let payload = ExportPayload::from_subset(&subset).unwrap();

    assert_eq!(payload.file_name, "weekly_output.csv");
    let text = String::from_utf8(payload.bytes.clone()).unwrap();
    assert_eq!(
        text,
        "Invoice Date,Customer,Dollars,Market Segment\n2023-01-03,ACME,30.5,Online\n"
    );

    let path = payload.write_to_dir(dir.path()).unwrap();
    let reread = load_source(&SourceLocator::from_path(&path), &profiles).unwrap();
    assert_eq!(reread.len(), 1);
    assert!(!reread.has_field(Field::QtyOrdered));
    assert_eq!(reread.records()[0].dollars, 30.5);
}
