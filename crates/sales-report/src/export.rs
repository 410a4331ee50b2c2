//! CSV export of a filtered subset.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use sales_transform::FilteredSubset;

use crate::error::{ReportError, Result};

/// Content type of the export artifact.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// `<dataset>_output.csv`.
pub fn export_file_name(dataset: &str) -> String {
    format!("{dataset}_output.csv")
}

/// Encodes the subset as comma-separated text with a header row.
pub fn encode_csv(subset: &FilteredSubset<'_>) -> Result<Vec<u8>> {
    let columns = subset.columns();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.iter().map(|column| column.header.as_str()))?;
    for record in subset.iter() {
        writer.write_record(
            columns
                .iter()
                .map(|column| record.cell(column.field).to_string()),
        )?;
    }
    writer.into_inner().map_err(|e| ReportError::Flush {
        message: e.to_string(),
    })
}

/// A named export ready to hand to a download or write to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    /// Data rows encoded, excluding the header.
    pub rows: usize,
}

impl ExportPayload {
    /// Encodes the subset under its dataset's export name.
    pub fn from_subset(subset: &FilteredSubset<'_>) -> Result<Self> {
        Ok(Self {
            file_name: export_file_name(subset.table().name()),
            content_type: CSV_CONTENT_TYPE,
            bytes: encode_csv(subset)?,
            rows: subset.len(),
        })
    }

    /// Writes the payload into `dir` under its file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        let write_error = |source| ReportError::Write {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(dir).map_err(write_error)?;
        fs::write(&path, &self.bytes).map_err(write_error)?;
        info!(
            path = %path.display(),
            bytes = self.bytes.len(),
            "export written"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sales_model::{FilterSelection, SalesRecord, SalesTable};
    use sales_transform::apply_filter;

    fn table() -> SalesTable {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        SalesTable::from_records(
            "dot_sales",
            vec![
                SalesRecord::new(date, "Online", "Smith, J", 0.1)
                    .with_parent("Acme Group")
                    .with_quantities(3, 2),
                SalesRecord::new(date, "Vending", "Bolt", -25.5),
            ],
        )
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("dot_sales"), "dot_sales_output.csv");
    }

    #[test]
    fn test_encode_csv() {
        let table = table();
        let subset = apply_filter(&table, &FilterSelection::all(&table));
        let text = String::from_utf8(encode_csv(&subset).unwrap()).unwrap();
        insta::assert_snapshot!(text, @r###"
        Table,Invoice Date,Parent Customer,Customer,MFG #,Item Description,Qty Ordered,Qty Received,Dollars,Market Segment
        ,2023-01-05,Acme Group,"Smith, J",,,3,2,0.1,Online
        ,2023-01-05,,Bolt,,,,,-25.5,Vending
        "###);
    }

    #[test]
    fn test_empty_subset_has_header_only() {
        let table = table();
        let subset = apply_filter(&table, &FilterSelection::default());
        let payload = ExportPayload::from_subset(&subset).unwrap();
        assert_eq!(payload.file_name, "dot_sales_output.csv");
        assert_eq!(payload.content_type, "text/csv");
        assert_eq!(payload.rows, 0);
        let text = String::from_utf8(payload.bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_write_to_dir() {
        let table = table();
        let dir = tempfile::TempDir::new().unwrap();
        let subset = apply_filter(&table, &FilterSelection::all(&table));
        let payload = ExportPayload::from_subset(&subset).unwrap();
        assert_eq!(payload.rows, 2);
        let path = payload.write_to_dir(&dir.path().join("out")).unwrap();
        assert!(path.ends_with("out/dot_sales_output.csv"));
        assert_eq!(fs::read(&path).unwrap(), payload.bytes);
    }
}
