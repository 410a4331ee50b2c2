use std::path::PathBuf;

use polars::prelude::DataFrame;
use serde::Serialize;

use sales_cli::pipeline::FilterOptions;
use sales_model::{DashboardSummary, FilterSelection, YearOverYear};

/// Dataset identity printed above every report.
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub dataset: String,
    pub source: String,
    pub profile: String,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    #[serde(flatten)]
    pub dataset: DatasetInfo,
    pub selection: FilterSelection,
    pub summary: DashboardSummary,
}

#[derive(Debug)]
pub struct OptionsReport {
    pub dataset: DatasetInfo,
    pub options: FilterOptions,
}

#[derive(Debug)]
pub struct RowsPreview {
    pub dataset: DatasetInfo,
    /// Rows matching the selection, before the preview limit.
    pub matched: usize,
    pub frame: DataFrame,
}

#[derive(Debug)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    Stdout { bytes: Vec<u8> },
}

#[derive(Debug)]
pub struct YoyReport {
    pub dataset: DatasetInfo,
    pub comparison: YearOverYear,
}
