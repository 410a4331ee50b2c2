//! Sales records and the loaded table.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::field::{ColumnSpec, Field};

/// One invoice line in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub invoice_date: NaiveDate,
    pub segment: String,
    pub customer: String,
    pub parent_customer: Option<String>,
    pub item_description: Option<String>,
    pub qty_ordered: Option<u64>,
    pub qty_received: Option<u64>,
    /// Signed amount in US dollars; credits and returns are negative.
    pub dollars: f64,
    pub table: Option<String>,
    pub mfg_number: Option<String>,
}

impl SalesRecord {
    pub fn new(
        invoice_date: NaiveDate,
        segment: impl Into<String>,
        customer: impl Into<String>,
        dollars: f64,
    ) -> Self {
        Self {
            invoice_date,
            segment: segment.into(),
            customer: customer.into(),
            parent_customer: None,
            item_description: None,
            qty_ordered: None,
            qty_received: None,
            dollars,
            table: None,
            mfg_number: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_customer = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_item(mut self, description: impl Into<String>) -> Self {
        self.item_description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_quantities(mut self, ordered: u64, received: u64) -> Self {
        self.qty_ordered = Some(ordered);
        self.qty_received = Some(received);
        self
    }

    /// Calendar year of the invoice date.
    pub fn year(&self) -> i32 {
        self.invoice_date.year()
    }

    /// Value of a single column, for display and export.
    pub fn cell(&self, field: Field) -> CellValue<'_> {
        match field {
            Field::Table => CellValue::from_text(self.table.as_deref()),
            Field::InvoiceDate => CellValue::Date(self.invoice_date),
            Field::ParentCustomer => CellValue::from_text(self.parent_customer.as_deref()),
            Field::Customer => CellValue::Text(&self.customer),
            Field::MfgNumber => CellValue::from_text(self.mfg_number.as_deref()),
            Field::ItemDescription => CellValue::from_text(self.item_description.as_deref()),
            Field::QtyOrdered => self.qty_ordered.map_or(CellValue::Missing, CellValue::Integer),
            Field::QtyReceived => self.qty_received.map_or(CellValue::Missing, CellValue::Integer),
            Field::Dollars => CellValue::Decimal(self.dollars),
            Field::Segment => CellValue::Text(&self.segment),
        }
    }
}

/// Borrowed view of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Missing,
    Text(&'a str),
    Date(NaiveDate),
    Integer(u64),
    Decimal(f64),
}

impl<'a> CellValue<'a> {
    fn from_text(value: Option<&'a str>) -> Self {
        value.map_or(CellValue::Missing, CellValue::Text)
    }
}

/// Renders dates as `YYYY-MM-DD` and decimals with the shortest text that
/// parses back to the same `f64`.
impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Text(value) => f.write_str(value),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
        }
    }
}

/// A loaded dataset: records in canonical shape plus the columns the source
/// provided, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    name: String,
    profile: String,
    columns: Vec<ColumnSpec>,
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(
        name: impl Into<String>,
        profile: impl Into<String>,
        columns: Vec<ColumnSpec>,
        records: Vec<SalesRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            profile: profile.into(),
            columns,
            records,
        }
    }

    /// Table with every canonical column under its default header.
    pub fn from_records(name: impl Into<String>, records: Vec<SalesRecord>) -> Self {
        let columns = Field::ALL.into_iter().map(ColumnSpec::canonical).collect();
        Self::new(name, "canonical", columns, records)
    }

    /// Dataset name, used to name exports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the schema profile the source was mapped with.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.columns.iter().any(|column| column.field == field)
    }

    /// Distinct invoice years, the options of the year filter.
    pub fn distinct_years(&self) -> BTreeSet<i32> {
        self.records.iter().map(SalesRecord::year).collect()
    }

    /// Distinct segment labels, the options of the segment filter.
    pub fn distinct_segments(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|record| record.segment.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cell_display_is_round_trip_friendly() {
        let record = SalesRecord::new(date(2023, 3, 9), "Online", "ACME", 1234.5678)
            .with_quantities(3, 2);
        assert_eq!(record.cell(Field::InvoiceDate).to_string(), "2023-03-09");
        assert_eq!(record.cell(Field::Dollars).to_string(), "1234.5678");
        assert_eq!(record.cell(Field::QtyOrdered).to_string(), "3");
        assert_eq!(record.cell(Field::ParentCustomer).to_string(), "");
        assert_eq!(
            SalesRecord::new(date(2023, 1, 1), "Online", "ACME", 100.0)
                .cell(Field::Dollars)
                .to_string(),
            "100"
        );
    }

    #[test]
    fn distinct_options_are_sorted() {
        let table = SalesTable::from_records(
            "sales",
            vec![
                SalesRecord::new(date(2023, 1, 1), "Vending", "A", 1.0),
                SalesRecord::new(date(2022, 1, 1), "Online", "B", 1.0),
                SalesRecord::new(date(2023, 6, 1), "Online", "C", 1.0),
            ],
        );
        assert_eq!(
            table.distinct_years().into_iter().collect::<Vec<_>>(),
            vec![2022, 2023]
        );
        assert_eq!(
            table.distinct_segments().into_iter().collect::<Vec<_>>(),
            vec!["Online".to_string(), "Vending".to_string()]
        );
    }
}
