//! Dataset loading: read, detect the schema profile, map to records.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use sales_model::{SalesTable, SchemaProfile};

use crate::delimited::{read_delimited, read_delimited_bytes};
use crate::error::{IngestError, Result};
use crate::raw::RawTable;
use crate::schema::{detect_profile, map_records};
use crate::source::{SourceKind, SourceLocator, default_delimiter};
use crate::workbook::{SheetSelection, read_workbook, read_workbook_bytes};

/// Loads a file-backed source.
///
/// Upload locators only identify content; load those with [`load_upload`].
pub fn load_source(locator: &SourceLocator, profiles: &[SchemaProfile]) -> Result<SalesTable> {
    let start = Instant::now();
    let raw = match locator {
        SourceLocator::Delimited { path, delimiter } => read_delimited(path, *delimiter)?,
        SourceLocator::Workbook {
            path,
            sheet,
            columns,
            max_rows,
        } => {
            let selection = SheetSelection {
                sheet: sheet.clone(),
                columns: *columns,
                max_rows: *max_rows,
            };
            read_workbook(path, &selection)?
        }
        SourceLocator::Upload { file_name, .. } => {
            return Err(IngestError::SourceNotFound {
                path: file_name.into(),
            });
        }
    };
    build_table(locator, &raw, profiles, start)
}

/// Loads an uploaded replacement dataset, dispatching on its extension.
pub fn load_upload(
    file_name: &str,
    bytes: &[u8],
    sheet: Option<String>,
    profiles: &[SchemaProfile],
) -> Result<(SourceLocator, SalesTable)> {
    let start = Instant::now();
    let path = Path::new(file_name);
    let raw = match SourceKind::from_extension(path) {
        Some(SourceKind::Delimited) => {
            read_delimited_bytes(file_name, bytes, default_delimiter(path))?
        }
        Some(SourceKind::Workbook) => {
            let selection = SheetSelection {
                sheet: sheet.clone(),
                ..SheetSelection::default()
            };
            read_workbook_bytes(file_name, bytes, &selection)?
        }
        None => {
            return Err(IngestError::UnsupportedUpload {
                file_name: file_name.to_string(),
            });
        }
    };
    let locator = SourceLocator::upload(file_name, bytes, sheet);
    let table = build_table(&locator, &raw, profiles, start)?;
    Ok((locator, table))
}

fn build_table(
    locator: &SourceLocator,
    raw: &RawTable,
    profiles: &[SchemaProfile],
    start: Instant,
) -> Result<SalesTable> {
    let source_name = locator.display_name();
    let matched = detect_profile(&source_name, &raw.headers, profiles)?;
    let records = map_records(&source_name, raw, &matched)?;
    let table = SalesTable::new(
        locator.dataset_name(),
        matched.profile.clone(),
        matched.column_specs(),
        records,
    );
    info!(
        source = %source_name,
        profile = %table.profile(),
        rows = table.len(),
        duration_ms = start.elapsed().as_millis(),
        "dataset loaded"
    );
    Ok(table)
}
