//! Dashboard session: one loaded dataset and the computations the dashboard
//! runs against it on every selection change.
//!
//! The loaded table is shared through the [`DatasetCache`]; a session only
//! holds an `Arc` to it, so any number of sessions can run the pipeline over
//! the same table concurrently.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use sales_ingest::{DatasetCache, SourceLocator};
use sales_model::{
    DashboardOptions, DashboardSummary, FilterSelection, SalesTable, YearOverYear,
};
use sales_report::ExportPayload;
use sales_transform::{FilteredSubset, apply_filter, summarize, year_over_year};

/// Values offered by the year and segment multi-selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub segments: Vec<String>,
}

impl FilterOptions {
    pub fn for_table(table: &SalesTable) -> Self {
        Self {
            years: table.distinct_years().into_iter().collect(),
            segments: table.distinct_segments().into_iter().collect(),
        }
    }
}

pub struct DashboardSession {
    cache: Arc<DatasetCache>,
    locator: SourceLocator,
    table: Arc<SalesTable>,
}

impl DashboardSession {
    /// Loads (or reuses) the dataset behind `locator`.
    pub fn open(cache: Arc<DatasetCache>, locator: SourceLocator) -> Result<Self> {
        let table = cache
            .get_or_load(&locator)
            .with_context(|| format!("load dataset {}", locator.display_name()))?;
        Ok(Self {
            cache,
            locator,
            table,
        })
    }

    /// Replaces the session's dataset with an uploaded file.
    ///
    /// On failure the current dataset stays in place.
    pub fn upload(&mut self, file_name: &str, bytes: &[u8], sheet: Option<String>) -> Result<()> {
        let (locator, table) = self
            .cache
            .get_or_load_upload(file_name, bytes, sheet)
            .with_context(|| format!("load uploaded dataset {file_name}"))?;
        info!(
            previous = %self.locator.display_name(),
            source = %file_name,
            rows = table.len(),
            "dataset replaced"
        );
        self.locator = locator;
        self.table = table;
        Ok(())
    }

    /// Drops the cached copy and reads the source again. Uploaded datasets
    /// have no backing file and are kept as they are.
    pub fn reload(&mut self) -> Result<()> {
        if matches!(self.locator, SourceLocator::Upload { .. }) {
            debug!(source = %self.locator.display_name(), "upload has no source to reload");
            return Ok(());
        }
        self.cache.invalidate(&self.locator);
        self.table = self
            .cache
            .get_or_load(&self.locator)
            .with_context(|| format!("reload dataset {}", self.locator.display_name()))?;
        Ok(())
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::for_table(&self.table)
    }

    /// Every year and segment present.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::all(&self.table)
    }

    pub fn subset(&self, selection: &FilterSelection) -> FilteredSubset<'_> {
        apply_filter(&self.table, selection)
    }

    pub fn summary(
        &self,
        selection: &FilterSelection,
        options: &DashboardOptions,
    ) -> DashboardSummary {
        summarize(&self.subset(selection), options)
    }

    pub fn export(&self, selection: &FilterSelection) -> Result<ExportPayload> {
        ExportPayload::from_subset(&self.subset(selection)).context("encode export")
    }

    /// Year-over-year comparison over the whole table, independent of any
    /// selection.
    pub fn year_over_year(&self, segment: Option<&str>, prior: i32, current: i32) -> YearOverYear {
        year_over_year(&self.table, segment, prior, current)
    }
}
