//! End-to-end loading from files on disk.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use sales_ingest::{DatasetCache, IngestError, SourceLocator, load_profiles, load_source};
use sales_model::{Field, SchemaProfile};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn dot_sales_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("dot_sales.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales").unwrap();
    let headers = [
        "Table",
        "Invoice Date",
        "Parent Customer",
        "Customer Name",
        "MFG #",
        "Item Full Description",
        "Qty Ordered",
        "Qty Received",
        "Dollars",
        "Segment Description 2",
        "Unused",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let rows = [
        ("2022-12-30", "Keystone", "Keystone East", 10442.0, 4.0, 4.0, 120.25, "Online"),
        ("2023-01-04", "", "Corner Shop", 777.0, 2.0, 1.0, 60.0, "Vending"),
    ];
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, "DOT").unwrap();
        sheet.write_string(r, 1, row.0).unwrap();
        if !row.1.is_empty() {
            sheet.write_string(r, 2, row.1).unwrap();
        }
        sheet.write_string(r, 3, row.2).unwrap();
        sheet.write_number(r, 4, row.3).unwrap();
        sheet.write_string(r, 5, "Widget").unwrap();
        sheet.write_number(r, 6, row.4).unwrap();
        sheet.write_number(r, 7, row.5).unwrap();
        sheet.write_number(r, 8, row.6).unwrap();
        sheet.write_string(r, 9, row.7).unwrap();
        sheet.write_string(r, 10, "ignored").unwrap();
    }
    workbook.save(&path).unwrap();
    path
}

#[test]
fn loads_market_segment_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "sales.csv",
        b"Invoice Date,Parent Customer,Customer,Item Description,Dollars,Market Segment\n\
          2023-01-05,Acme Group,ACME,Chips,\"1,250.00\",Online\n\
          01/06/2023,,Bolt,Soda,(25.5),Vending\n",
    );

    let table = load_source(&SourceLocator::from_path(&path), &SchemaProfile::builtin()).unwrap();

    assert_eq!(table.name(), "sales");
    assert_eq!(table.profile(), "market_segment");
    assert_eq!(table.len(), 2);
    let records = table.records();
    assert_eq!(records[0].dollars, 1250.0);
    assert_eq!(records[0].parent_customer.as_deref(), Some("Acme Group"));
    assert_eq!(
        records[1].invoice_date,
        NaiveDate::from_ymd_opt(2023, 1, 6).unwrap()
    );
    assert_eq!(records[1].dollars, -25.5);
    assert_eq!(records[1].parent_customer, None);

    let headers: Vec<&str> = table.columns().iter().map(|c| c.header.as_str()).collect();
    assert_eq!(
        headers,
        vec![
            "Invoice Date",
            "Parent Customer",
            "Customer",
            "Item Description",
            "Dollars",
            "Market Segment"
        ]
    );
}

#[test]
fn loads_dot_sales_workbook_with_column_range() {
    let dir = TempDir::new().unwrap();
    let path = dot_sales_workbook(&dir);
    let locator = SourceLocator::Workbook {
        path,
        sheet: Some("Sales".to_string()),
        columns: Some("A:J".parse().unwrap()),
        max_rows: Some(10),
    };

    let table = load_source(&locator, &SchemaProfile::builtin()).unwrap();

    assert_eq!(table.profile(), "dot_sales");
    assert_eq!(table.columns().len(), 10);
    assert!(table.has_field(Field::QtyReceived));
    let first = &table.records()[0];
    assert_eq!(first.mfg_number.as_deref(), Some("10442"));
    assert_eq!(first.qty_received, Some(4));
    assert_eq!(first.dollars, 120.25);
    assert_eq!(first.year(), 2022);
    assert_eq!(table.records()[1].parent_customer, None);
}

#[test]
fn loads_excel_date_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dated.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("m/d/yyyy");
    for (col, header) in ["Invoice Date", "Customer", "Dollars", "Market Segment"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let dates = [(2022, 12, 31), (2023, 1, 2)];
    for (idx, (year, month, day)) in dates.iter().enumerate() {
        let r = idx as u32 + 1;
        let date = ExcelDateTime::from_ymd(*year, *month, *day).unwrap();
        sheet
            .write_datetime_with_format(r, 0, &date, &date_format)
            .unwrap();
        sheet.write_string(r, 1, "ACME").unwrap();
        sheet.write_number(r, 2, 10.0).unwrap();
        sheet.write_string(r, 3, "Online").unwrap();
    }
    workbook.save(&path).unwrap();

    let table = load_source(&SourceLocator::from_path(&path), &SchemaProfile::builtin()).unwrap();

    let records = table.records();
    assert_eq!(
        records[0].invoice_date,
        NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()
    );
    assert_eq!(records[0].year(), 2022);
    assert_eq!(
        records[1].invoice_date,
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
    );
    assert_eq!(records[1].year(), 2023);
}

#[test]
fn workbook_max_rows_limits_data_rows() {
    let dir = TempDir::new().unwrap();
    let locator = SourceLocator::Workbook {
        path: dot_sales_workbook(&dir),
        sheet: None,
        columns: None,
        max_rows: Some(1),
    };
    let table = load_source(&locator, &SchemaProfile::builtin()).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn missing_sheet_is_reported() {
    let dir = TempDir::new().unwrap();
    let locator = SourceLocator::workbook(dot_sales_workbook(&dir), Some("Nope".to_string()));
    let err = load_source(&locator, &SchemaProfile::builtin()).unwrap_err();
    assert!(matches!(err, IngestError::SheetNotFound { .. }));
}

#[test]
fn schema_mismatch_names_missing_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.csv", b"Date,Amount\n2023-01-05,10\n");
    let err = load_source(&SourceLocator::from_path(&path), &SchemaProfile::builtin())
        .unwrap_err();
    match err {
        IngestError::SchemaMismatch { missing, .. } => {
            assert!(missing.contains(&Field::Customer));
            assert!(missing.contains(&Field::Segment));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_row_fails_the_load() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "sales.csv",
        b"Invoice Date,Customer,Dollars,Market Segment\n\
          2023-01-05,ACME,10,Online\n\
          not-a-date,ACME,10,Online\n",
    );
    let err = load_source(&SourceLocator::from_path(&path), &SchemaProfile::builtin())
        .unwrap_err();
    match err {
        IngestError::MalformedRow { row, column, .. } => {
            assert_eq!(row, 2);
            assert_eq!(column, "Invoice Date");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cache_memoizes_until_invalidated() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "sales.csv",
        b"Invoice Date,Customer,Dollars,Market Segment\n2023-01-05,ACME,10,Online\n",
    );
    let cache = DatasetCache::default();
    let locator = SourceLocator::from_path(&path);

    let first = cache.get_or_load(&locator).unwrap();
    // Rewriting the file is not visible until the entry is invalidated.
    write_file(
        &dir,
        "sales.csv",
        b"Invoice Date,Customer,Dollars,Market Segment\n2023-01-05,ACME,10,Online\n2023-01-06,ACME,5,Online\n",
    );
    let second = cache.get_or_load(&locator).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 1);

    assert!(cache.invalidate(&locator));
    let third = cache.get_or_load(&locator).unwrap();
    assert_eq!(third.len(), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn identical_uploads_share_a_cache_entry() {
    let cache = DatasetCache::default();
    let bytes = b"Invoice Date\tCustomer\tDollars\tMarket Segment\n2023-01-05\tACME\t10\tOnline\n";

    let (a, first) = cache.get_or_load_upload("weekly.tsv", bytes, None).unwrap();
    let (b, second) = cache.get_or_load_upload("weekly.tsv", bytes, None).unwrap();

    assert_eq!(a, b);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.records()[0].customer, "ACME");
}

#[test]
fn failed_loads_are_not_cached() {
    let cache = DatasetCache::default();
    let locator = SourceLocator::from_path("/definitely/not/here.csv");
    assert!(matches!(
        cache.get_or_load(&locator),
        Err(IngestError::SourceNotFound { .. })
    ));
    assert!(cache.is_empty());
}

#[test]
fn extra_profiles_load_from_json() {
    let dir = TempDir::new().unwrap();
    let profiles = write_file(
        &dir,
        "profiles.json",
        br#"[{"name": "legacy", "columns": [
            {"field": "invoice_date", "aliases": ["Inv Dt"]},
            {"field": "customer", "aliases": ["Cust"]},
            {"field": "dollars", "aliases": ["Amt"]},
            {"field": "segment", "aliases": ["Seg"]}
        ]}]"#,
    );
    let data = write_file(&dir, "legacy.csv", b"Inv Dt,Cust,Amt,Seg\n2023-03-01,ACME,5,Online\n");

    let profiles = load_profiles(&profiles).unwrap();
    assert_eq!(profiles.len(), SchemaProfile::builtin().len() + 1);

    let table = load_source(&SourceLocator::from_path(&data), &profiles).unwrap();
    assert_eq!(table.profile(), "legacy");
    assert_eq!(table.records()[0].segment, "Online");
}

#[test]
fn duplicate_profile_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let profiles = write_file(
        &dir,
        "profiles.json",
        br#"[{"name": "canonical", "columns": [
            {"field": "invoice_date", "aliases": ["D"]},
            {"field": "customer", "aliases": ["C"]},
            {"field": "dollars", "aliases": ["A"]},
            {"field": "segment", "aliases": ["S"]}
        ]}]"#,
    );
    assert!(matches!(
        load_profiles(&profiles),
        Err(IngestError::ProfileConfig { .. })
    ));
}
