//! Sales dashboard filtering and aggregation.
//!
//! Every function here is pure over a loaded [`SalesTable`]: filtering
//! borrows the table, and aggregation reads the filtered subset. Nothing can
//! fail except building the Polars display frame.
//!
//! # Example
//!
//! ```ignore
//! use sales_model::{DashboardOptions, FilterSelection};
//! use sales_transform::{apply_filter, summarize};
//!
//! let selection = FilterSelection::all(&table).with_years([2023]);
//! let subset = apply_filter(&table, &selection);
//! let summary = summarize(&subset, &DashboardOptions::default());
//! ```
//!
//! [`SalesTable`]: sales_model::SalesTable

mod aggregate;
mod filter;
mod frame;
mod summary;

// Filtering
pub use filter::{FilteredSubset, apply_filter};

// Aggregation
pub use aggregate::{
    by_dimension, by_week, quantity_by_dimension, sales_by_customer, sales_by_parent_segment,
    sales_by_segment, top_n, totals, week_start, year_over_year,
};
pub use summary::summarize;

// Display
pub use frame::display_frame;
