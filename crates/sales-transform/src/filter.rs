//! Filter engine: year and segment selection over a loaded table.

use tracing::debug;

use sales_model::{ColumnSpec, FilterSelection, SalesRecord, SalesTable};

/// Records of a table that match a [`FilterSelection`], in table order.
///
/// Borrows the table; the table itself is never modified.
#[derive(Debug, Clone)]
pub struct FilteredSubset<'a> {
    table: &'a SalesTable,
    records: Vec<&'a SalesRecord>,
}

impl<'a> FilteredSubset<'a> {
    /// Every record of the table.
    pub fn all(table: &'a SalesTable) -> Self {
        Self {
            table,
            records: table.records().iter().collect(),
        }
    }

    pub fn table(&self) -> &'a SalesTable {
        self.table
    }

    /// Display columns of the source table.
    pub fn columns(&self) -> &'a [ColumnSpec] {
        self.table.columns()
    }

    pub fn records(&self) -> &[&'a SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keeps the records whose invoice year and segment are both selected.
///
/// An empty year or segment set yields an empty subset.
pub fn apply_filter<'a>(table: &'a SalesTable, selection: &FilterSelection) -> FilteredSubset<'a> {
    let records: Vec<&SalesRecord> = if selection.is_empty() {
        Vec::new()
    } else {
        table
            .records()
            .iter()
            .filter(|record| selection.matches(record))
            .collect()
    };
    debug!(
        dataset = %table.name(),
        years = selection.years.len(),
        segments = selection.segments.len(),
        selected = records.len(),
        total = table.len(),
        "filter applied"
    );
    FilteredSubset { table, records }
}
