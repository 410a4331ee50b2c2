//! Summary shapes produced by the aggregation engine.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A grouping key and the value summed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow<K, V = f64> {
    pub key: K,
    pub value: V,
}

impl<K, V> AggregateRow<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// KPI card values for a filtered subset.
///
/// Every field is zero for an empty subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub row_count: usize,
    pub dollars: f64,
    pub qty_received: u64,
    pub qty_ordered: u64,
    pub mean_dollars: f64,
    pub distinct_customers: usize,
}

/// Dollars for one week of the time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTotal {
    pub week_start: NaiveDate,
    pub dollars: f64,
}

/// Comparison of one segment's (or the whole table's) totals across two
/// years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOverYear {
    pub segment: Option<String>,
    pub prior_year: i32,
    pub current_year: i32,
    pub prior: f64,
    pub current: f64,
    pub delta: f64,
    /// `None` when the prior-year total is zero.
    pub percent_delta: Option<f64>,
}

/// Parent customer grouping key. Records without a parent land in
/// [`ParentKey::Ungrouped`] so grouped sums stay conservative.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ParentKey {
    Ungrouped,
    Parent(String),
}

impl ParentKey {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Ungrouped => None,
            Self::Parent(name) => Some(name),
        }
    }
}

impl From<Option<String>> for ParentKey {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Ungrouped, Self::Parent)
    }
}

impl From<ParentKey> for Option<String> {
    fn from(value: ParentKey) -> Self {
        match value {
            ParentKey::Ungrouped => None,
            ParentKey::Parent(name) => Some(name),
        }
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ungrouped => f.write_str("(ungrouped)"),
            Self::Parent(name) => f.write_str(name),
        }
    }
}

/// Key of the parent-customer chart: parent within segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParentSegmentKey {
    pub parent: ParentKey,
    pub segment: String,
}

impl fmt::Display for ParentSegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.parent, self.segment)
    }
}

/// Every summary table the dashboard page renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub totals: Totals,
    pub sales_by_segment: Vec<AggregateRow<String>>,
    pub weekly_sales: Vec<WeeklyTotal>,
    pub top_distributors: Vec<AggregateRow<String>>,
    pub top_parents: Vec<AggregateRow<ParentSegmentKey>>,
}

/// Knobs for [`DashboardSummary`] assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    /// Bars in the "sales by distributor" chart.
    pub distributor_limit: usize,
    /// Bars in the "sales by parent" chart.
    pub parent_limit: usize,
    /// First day of a week in the weekly time series.
    pub week_start: Weekday,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            distributor_limit: 20,
            parent_limit: 15,
            week_start: Weekday::Mon,
        }
    }
}

impl DashboardOptions {
    #[must_use]
    pub fn with_distributor_limit(mut self, limit: usize) -> Self {
        self.distributor_limit = limit;
        self
    }

    #[must_use]
    pub fn with_parent_limit(mut self, limit: usize) -> Self {
        self.parent_limit = limit;
        self
    }

    #[must_use]
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }
}
