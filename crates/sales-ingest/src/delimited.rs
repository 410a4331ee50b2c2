//! Delimited text reading through Polars.
//!
//! Every column is read as text; typing happens in the schema step so that a
//! bad cell is reported as a malformed row instead of a silent null.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use polars::prelude::*;

use sales_model::normalize_header;

use crate::error::{IngestError, Result};
use crate::raw::{RawCell, RawRow, RawTable};

/// Reads a delimited file with a header row.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let source_name = path.display().to_string();
    let head = read_head(path)?;
    check_head(&head, &source_name)?;

    let df = text_read_options(delimiter)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| csv_error(&source_name, &e))?
        .finish()
        .map_err(|e| csv_error(&source_name, &e))?;

    frame_to_raw(&df)
}

/// Reads delimited text already held in memory, e.g. an upload.
pub fn read_delimited_bytes(source_name: &str, bytes: &[u8], delimiter: u8) -> Result<RawTable> {
    check_head(bytes, source_name)?;

    let df = text_read_options(delimiter)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| csv_error(source_name, &e))?;

    frame_to_raw(&df)
}

fn text_read_options(delimiter: u8) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        // Zero inference rows reads every column as String.
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(delimiter))
}

fn csv_error(source_name: &str, err: &PolarsError) -> IngestError {
    IngestError::CsvParse {
        source_name: source_name.to_string(),
        message: err.to_string(),
    }
}

/// Reads the first bytes of a file for encoding and emptiness checks.
fn read_head(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut buffer = Vec::with_capacity(4096);
    file.by_ref()
        .take(4096)
        .read_to_end(&mut buffer)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(buffer)
}

/// Rejects UTF-16 input and sources without a header line.
fn check_head(head: &[u8], source_name: &str) -> Result<()> {
    // UTF-16 LE / BE byte-order marks
    let encoding = match head {
        [0xFF, 0xFE, ..] => Some("UTF-16 LE"),
        [0xFE, 0xFF, ..] => Some("UTF-16 BE"),
        _ => None,
    };
    if let Some(encoding) = encoding {
        return Err(IngestError::UnsupportedEncoding {
            source_name: source_name.to_string(),
            encoding,
        });
    }

    let text = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    if text.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptySource {
            source_name: source_name.to_string(),
        });
    }
    Ok(())
}

/// Converts an all-text frame to the raw grid.
fn frame_to_raw(df: &DataFrame) -> Result<RawTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_header(name.as_str()))
        .collect();

    let columns = df
        .get_columns()
        .iter()
        .map(|column| column.as_materialized_series().str())
        .collect::<PolarsResult<Vec<_>>>()?;

    let rows = (0..df.height())
        .map(|idx| RawRow {
            number: idx + 1,
            cells: columns
                .iter()
                .map(|values| values.get(idx).map_or(RawCell::Empty, RawCell::text))
                .collect(),
        })
        .collect();

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_delimited_keeps_text() {
        let file = create_temp_csv(
            "Invoice Date,Dollars,Customer\n2023-01-05,001.50,ACME\n2023-01-06,,\"Smith, J\"\n",
        );
        let table = read_delimited(file.path(), b',').unwrap();

        assert_eq!(table.headers, vec!["Invoice Date", "Dollars", "Customer"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cell(1), &RawCell::Text("001.50".to_string()));
        assert_eq!(table.rows[1].cell(1), &RawCell::Empty);
        assert_eq!(table.rows[1].cell(2), &RawCell::Text("Smith, J".to_string()));
        assert_eq!(table.rows[1].number, 2);
    }

    #[test]
    fn test_read_delimited_semicolon() {
        let file = create_temp_csv("A;B\n1;2\n");
        let table = read_delimited(file.path(), b';').unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows[0].cells.len(), 2);
    }

    #[test]
    fn test_read_delimited_with_bom() {
        let file = create_temp_csv("\u{feff}A,B\n1,2\n");
        let table = read_delimited(file.path(), b',').unwrap();
        assert_eq!(table.headers[0], "A");
    }

    #[test]
    fn test_read_delimited_missing_file() {
        let result = read_delimited(Path::new("/definitely/not/here.csv"), b',');
        assert!(matches!(result, Err(IngestError::SourceNotFound { .. })));
    }

    #[test]
    fn test_read_delimited_empty_file() {
        let file = create_temp_csv("");
        let result = read_delimited(file.path(), b',');
        assert!(matches!(result, Err(IngestError::EmptySource { .. })));
    }

    #[test]
    fn test_read_delimited_rejects_utf16() {
        let result = read_delimited_bytes("upload.csv", &[0xFF, 0xFE, b'A', 0], b',');
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_read_delimited_bytes() {
        let table = read_delimited_bytes("upload.csv", b"A,B\nx,y\n", b',').unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cell(0), &RawCell::Text("x".to_string()));
    }
}
