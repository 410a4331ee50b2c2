//! User filter selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::{SalesRecord, SalesTable};

/// Years and market segments chosen in the sidebar filters.
///
/// An empty set in either dimension selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub segments: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        segments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Default selection: every year and segment present in the table.
    pub fn all(table: &SalesTable) -> Self {
        Self {
            years: table.distinct_years(),
            segments: table.distinct_segments(),
        }
    }

    #[must_use]
    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_segments(mut self, segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.segments = segments.into_iter().map(Into::into).collect();
        self
    }

    /// True when either dimension has nothing selected.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.segments.is_empty()
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.years.contains(&record.year()) && self.segments.contains(&record.segment)
    }
}
