//! Dashboard summary assembly.

use tracing::debug;

use sales_model::{DashboardOptions, DashboardSummary};

use crate::aggregate::{
    by_week, sales_by_customer, sales_by_parent_segment, sales_by_segment, top_n, totals,
};
use crate::filter::FilteredSubset;

/// Computes every dashboard figure for one filtered subset.
pub fn summarize(subset: &FilteredSubset<'_>, options: &DashboardOptions) -> DashboardSummary {
    let summary = DashboardSummary {
        totals: totals(subset),
        sales_by_segment: sales_by_segment(subset),
        weekly_sales: by_week(subset, options.week_start),
        top_distributors: top_n(sales_by_customer(subset), options.distributor_limit),
        top_parents: top_n(sales_by_parent_segment(subset), options.parent_limit),
    };
    debug!(
        rows = subset.len(),
        segments = summary.sales_by_segment.len(),
        weeks = summary.weekly_sales.len(),
        "dashboard summary computed"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::apply_filter;
    use chrono::NaiveDate;
    use sales_model::{FilterSelection, SalesRecord, SalesTable};

    fn table() -> SalesTable {
        let records = (0..30)
            .map(|i| {
                SalesRecord::new(
                    NaiveDate::from_ymd_opt(2023, 1, 1 + i % 28).unwrap(),
                    if i % 2 == 0 { "Online" } else { "Vending" },
                    format!("Customer {i:02}"),
                    f64::from(i),
                )
            })
            .collect();
        SalesTable::from_records("sales", records)
    }

    #[test]
    fn test_summary_applies_limits() {
        let table = table();
        let subset = apply_filter(&table, &FilterSelection::all(&table));
        let summary = summarize(&subset, &DashboardOptions::default());

        assert_eq!(summary.totals.row_count, 30);
        assert_eq!(summary.top_distributors.len(), 20);
        assert_eq!(summary.top_distributors[0].key, "Customer 29");
        assert_eq!(summary.top_parents.len(), 2);
        assert_eq!(summary.sales_by_segment.len(), 2);
    }

    #[test]
    fn test_summary_of_empty_selection() {
        let table = table();
        let selection = FilterSelection::all(&table).with_years(Vec::new());
        let summary = summarize(&apply_filter(&table, &selection), &DashboardOptions::default());

        assert_eq!(summary.totals.dollars, 0.0);
        assert_eq!(summary.totals.mean_dollars, 0.0);
        assert!(summary.sales_by_segment.is_empty());
        assert!(summary.weekly_sales.is_empty());
        assert!(summary.top_distributors.is_empty());
    }
}
