//! Error types for dataset loading.

use std::path::PathBuf;
use thiserror::Error;

use sales_model::Field;

use crate::source::supported_extensions;

/// Errors that can occur while loading a sales dataset.
///
/// Every variant is fatal to the session: a dashboard is never rendered from
/// a partially loaded table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Source Errors ===
    /// Source file does not exist.
    #[error("source not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Workbook exists but has no sheet with the requested name.
    #[error("sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: String,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {source_name}")]
    UnsupportedEncoding {
        source_name: String,
        encoding: &'static str,
    },

    /// Upload has an extension the loader cannot dispatch on.
    #[error(
        "unsupported upload '{file_name}': expected one of {}",
        supported_extensions()
    )]
    UnsupportedUpload { file_name: String },

    /// Column range such as `A:AH` could not be parsed.
    #[error("invalid column range '{value}'")]
    InvalidColumnRange { value: String },

    // === Parsing Errors ===
    /// Failed to parse delimited text with Polars.
    #[error("failed to parse delimited source {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },

    /// Failed to open or read a workbook.
    #[error("failed to read workbook {source_name}: {message}")]
    Workbook {
        source_name: String,
        message: String,
    },

    /// Source has no header row.
    #[error("source is empty: {source_name}")]
    EmptySource { source_name: String },

    // === Schema Errors ===
    /// Required columns are absent under every known profile.
    #[error(
        "{source_name} does not match any schema profile; closest is '{profile}', missing {}{}",
        format_fields(.missing),
        format_suggestions(.suggestions)
    )]
    SchemaMismatch {
        source_name: String,
        profile: String,
        missing: Vec<Field>,
        suggestions: Vec<(Field, String)>,
    },

    /// A cell failed to parse. The whole load fails on the first one.
    #[error("malformed row {row} in {source_name}: column '{column}' value '{value}': {reason}")]
    MalformedRow {
        source_name: String,
        row: usize,
        column: String,
        value: String,
        reason: &'static str,
    },

    // === Configuration Errors ===
    /// Schema profile file could not be read or is invalid.
    #[error("invalid schema profiles in {path}: {message}")]
    ProfileConfig { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.default_header())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_suggestions(suggestions: &[(Field, String)]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let hints = suggestions
        .iter()
        .map(|(field, header)| format!("{} -> '{header}'?", field.default_header()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(" (did you mean: {hints})")
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::SourceNotFound {
            path: PathBuf::from("/data/data.xlsx"),
        };
        assert_eq!(err.to_string(), "source not found: /data/data.xlsx");
    }

    #[test]
    fn test_schema_mismatch_lists_suggestions() {
        let err = IngestError::SchemaMismatch {
            source_name: "sales.csv".to_string(),
            profile: "market_segment".to_string(),
            missing: vec![Field::Segment],
            suggestions: vec![(Field::Segment, "Market Segmnt".to_string())],
        };
        assert_eq!(
            err.to_string(),
            "sales.csv does not match any schema profile; closest is 'market_segment', \
             missing Market Segment (did you mean: Market Segment -> 'Market Segmnt'?)"
        );
    }

    #[test]
    fn test_unsupported_upload_lists_extensions() {
        let err = IngestError::UnsupportedUpload {
            file_name: "notes.pdf".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported upload 'notes.pdf': expected one of \
             .csv, .tsv, .txt, .xlsx, .xlsm, .xlsb, .xls, .ods"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
