//! Spreadsheet workbook reading through calamine.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use tracing::debug;

use sales_model::normalize_header;

use crate::error::{IngestError, Result};
use crate::raw::{RawCell, RawRow, RawTable};
use crate::source::ColumnRange;

/// Which part of a workbook to read.
#[derive(Debug, Clone, Default)]
pub struct SheetSelection {
    /// First sheet when `None`.
    pub sheet: Option<String>,
    pub columns: Option<ColumnRange>,
    pub max_rows: Option<usize>,
}

/// Reads one sheet of a workbook file. The first non-empty row is the header.
pub fn read_workbook(path: &Path, selection: &SheetSelection) -> Result<RawTable> {
    if !path.exists() {
        return Err(IngestError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let source_name = path.display().to_string();
    let mut workbook =
        open_workbook_auto(path).map_err(|e| workbook_error(&source_name, e.to_string()))?;
    read_sheet(&mut workbook, &source_name, selection)
}

/// Reads one sheet of a workbook held in memory.
pub fn read_workbook_bytes(
    source_name: &str,
    bytes: &[u8],
    selection: &SheetSelection,
) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| workbook_error(source_name, e.to_string()))?;
    read_sheet(&mut workbook, source_name, selection)
}

fn read_sheet<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    source_name: &str,
    selection: &SheetSelection,
) -> Result<RawTable> {
    let names = workbook.sheet_names();
    let sheet = match &selection.sheet {
        Some(sheet) if names.iter().any(|name| name == sheet) => sheet.clone(),
        Some(sheet) => {
            return Err(IngestError::SheetNotFound {
                path: source_name.into(),
                sheet: sheet.clone(),
                available: names.join(", "),
            });
        }
        None => names.first().cloned().ok_or_else(|| IngestError::EmptySource {
            source_name: source_name.to_string(),
        })?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| workbook_error(source_name, e.to_string()))?;
    debug!(
        source = %source_name,
        sheet = %sheet,
        height = range.height(),
        width = range.width(),
        "worksheet opened"
    );

    range_to_raw(&range, source_name, selection)
}

fn range_to_raw(
    range: &Range<Data>,
    source_name: &str,
    selection: &SheetSelection,
) -> Result<RawTable> {
    let empty = || IngestError::EmptySource {
        source_name: source_name.to_string(),
    };
    let (_, first_col) = range.start().ok_or_else(empty)?;
    let in_range = |offset: usize| {
        selection
            .columns
            .is_none_or(|columns| columns.contains(first_col + offset as u32))
    };

    let mut rows = range.rows().map(|row| {
        row.iter()
            .enumerate()
            .filter(|(offset, _)| in_range(*offset))
            .map(|(_, cell)| to_raw_cell(cell))
            .collect::<Vec<_>>()
    });

    let header = rows
        .by_ref()
        .find(|cells| !cells.iter().all(RawCell::is_empty))
        .ok_or_else(empty)?;
    let headers = header
        .iter()
        .map(|cell| normalize_header(&cell.to_string()))
        .collect();

    let limit = selection.max_rows.unwrap_or(usize::MAX);
    let rows = rows
        .take(limit)
        .enumerate()
        .map(|(idx, cells)| RawRow {
            number: idx + 1,
            cells,
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            RawCell::text(value)
        }
        Data::Float(value) => RawCell::Number(*value),
        Data::Int(value) => RawCell::Number(*value as f64),
        Data::Bool(value) => RawCell::Text(value.to_string()),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => RawCell::Date(datetime.date()),
            None => RawCell::Number(value.as_f64()),
        },
        Data::Error(error) => RawCell::Error(error.to_string()),
    }
}

fn workbook_error(source_name: &str, message: String) -> IngestError {
    IngestError::Workbook {
        source_name: source_name.to_string(),
        message,
    }
}
