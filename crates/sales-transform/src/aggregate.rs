//! Aggregation engine: KPI totals, grouped sums, weekly series and
//! year-over-year comparison.
//!
//! Grouped sums sort descending by value with ties broken by key ascending,
//! so repeated runs over the same subset produce identical output.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};

use sales_model::{
    AggregateRow, ParentKey, ParentSegmentKey, SalesRecord, SalesTable, Totals, WeeklyTotal,
    YearOverYear,
};

use crate::filter::FilteredSubset;

/// KPI totals. The mean of an empty subset is zero.
pub fn totals(subset: &FilteredSubset<'_>) -> Totals {
    let mut totals = Totals::default();
    let mut customers = BTreeSet::new();
    for record in subset.iter() {
        totals.row_count += 1;
        totals.dollars += record.dollars;
        totals.qty_received += record.qty_received.unwrap_or(0);
        totals.qty_ordered += record.qty_ordered.unwrap_or(0);
        customers.insert(record.customer.as_str());
    }
    totals.distinct_customers = customers.len();
    if totals.row_count > 0 {
        totals.mean_dollars = totals.dollars / totals.row_count as f64;
    }
    totals
}

/// Sums dollars per key.
pub fn by_dimension<K, F>(subset: &FilteredSubset<'_>, key_fn: F) -> Vec<AggregateRow<K>>
where
    K: Ord,
    F: Fn(&SalesRecord) -> K,
{
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();
    for record in subset.iter() {
        *sums.entry(key_fn(record)).or_insert(0.0) += record.dollars;
    }
    sorted_rows(sums, f64::total_cmp)
}

/// Sums a quantity per key. Records without the quantity count as zero.
pub fn quantity_by_dimension<K, F, Q>(
    subset: &FilteredSubset<'_>,
    key_fn: F,
    quantity: Q,
) -> Vec<AggregateRow<K, u64>>
where
    K: Ord,
    F: Fn(&SalesRecord) -> K,
    Q: Fn(&SalesRecord) -> Option<u64>,
{
    let mut sums: BTreeMap<K, u64> = BTreeMap::new();
    for record in subset.iter() {
        *sums.entry(key_fn(record)).or_insert(0) += quantity(record).unwrap_or(0);
    }
    sorted_rows(sums, u64::cmp)
}

fn sorted_rows<K: Ord, V>(
    sums: BTreeMap<K, V>,
    compare: impl Fn(&V, &V) -> Ordering,
) -> Vec<AggregateRow<K, V>> {
    let mut rows: Vec<AggregateRow<K, V>> = sums
        .into_iter()
        .map(|(key, value)| AggregateRow::new(key, value))
        .collect();
    rows.sort_by(|a, b| compare(&b.value, &a.value).then_with(|| a.key.cmp(&b.key)));
    rows
}

pub fn sales_by_segment(subset: &FilteredSubset<'_>) -> Vec<AggregateRow<String>> {
    by_dimension(subset, |record| record.segment.clone())
}

pub fn sales_by_customer(subset: &FilteredSubset<'_>) -> Vec<AggregateRow<String>> {
    by_dimension(subset, |record| record.customer.clone())
}

/// Null parents are kept under [`ParentKey::Ungrouped`].
pub fn sales_by_parent_segment(subset: &FilteredSubset<'_>) -> Vec<AggregateRow<ParentSegmentKey>> {
    by_dimension(subset, |record| ParentSegmentKey {
        parent: ParentKey::from(record.parent_customer.clone()),
        segment: record.segment.clone(),
    })
}

/// First `min(n, len)` rows.
pub fn top_n<K, V>(mut rows: Vec<AggregateRow<K, V>>, n: usize) -> Vec<AggregateRow<K, V>> {
    rows.truncate(n);
    rows
}

/// Start of the week containing `date`.
pub fn week_start(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let offset =
        (7 + date.weekday().num_days_from_monday() - first_day.num_days_from_monday()) % 7;
    date.checked_sub_days(Days::new(u64::from(offset))).unwrap_or(date)
}

/// Dollars per week, in date order, for every week from the first to the
/// last invoice of the subset. Weeks without invoices report zero.
pub fn by_week(subset: &FilteredSubset<'_>, first_day: Weekday) -> Vec<WeeklyTotal> {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in subset.iter() {
        *sums
            .entry(week_start(record.invoice_date, first_day))
            .or_insert(0.0) += record.dollars;
    }
    let (Some(&first), Some(&last)) = (sums.keys().next(), sums.keys().next_back()) else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut current = first;
    while current <= last {
        weeks.push(WeeklyTotal {
            week_start: current,
            dollars: sums.get(&current).copied().unwrap_or(0.0),
        });
        match current.checked_add_days(Days::new(7)) {
            Some(next) => current = next,
            None => break,
        }
    }
    weeks
}

/// Compares two calendar years over the whole table, optionally restricted
/// to one segment. The percent change is `None` when the prior total is zero.
pub fn year_over_year(
    table: &SalesTable,
    segment: Option<&str>,
    prior_year: i32,
    current_year: i32,
) -> YearOverYear {
    let year_total = |year: i32| -> f64 {
        table
            .records()
            .iter()
            .filter(|record| record.year() == year)
            .filter(|record| segment.is_none_or(|segment| record.segment == segment))
            .map(|record| record.dollars)
            .sum()
    };
    let prior = year_total(prior_year);
    let current = year_total(current_year);
    let delta = current - prior;
    let percent_delta = (prior != 0.0).then(|| delta / prior * 100.0);
    YearOverYear {
        segment: segment.map(str::to_string),
        prior_year,
        current_year,
        prior,
        current,
        delta,
        percent_delta,
    }
}
