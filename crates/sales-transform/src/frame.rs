//! Display table of a filtered subset as a Polars DataFrame.

use polars::prelude::*;

use sales_model::{ColumnSpec, Field, SalesRecord};

use crate::filter::FilteredSubset;

/// Builds the display table: the source's columns in display order under
/// their source headers, at most `limit` rows.
///
/// Dates are rendered as ISO-8601 text; dollars and quantities keep their
/// numeric types.
pub fn display_frame(subset: &FilteredSubset<'_>, limit: Option<usize>) -> PolarsResult<DataFrame> {
    let records: Vec<&SalesRecord> = subset
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    let columns = subset
        .columns()
        .iter()
        .map(|spec| build_column(spec, &records))
        .collect();
    DataFrame::new(columns)
}

fn build_column(spec: &ColumnSpec, records: &[&SalesRecord]) -> Column {
    let name: PlSmallStr = spec.header.as_str().into();
    match spec.field {
        Field::Dollars => {
            let values: Vec<f64> = records.iter().map(|record| record.dollars).collect();
            Series::new(name, values).into_column()
        }
        Field::QtyOrdered => {
            let values: Vec<Option<u64>> =
                records.iter().map(|record| record.qty_ordered).collect();
            Series::new(name, values).into_column()
        }
        Field::QtyReceived => {
            let values: Vec<Option<u64>> =
                records.iter().map(|record| record.qty_received).collect();
            Series::new(name, values).into_column()
        }
        field => {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|record| {
                    let cell = record.cell(field);
                    let text = cell.to_string();
                    (!text.is_empty()).then_some(text)
                })
                .collect();
            Series::new(name, values).into_column()
        }
    }
}
