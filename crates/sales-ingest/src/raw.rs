//! Untyped grid shared by the delimited and workbook readers.

use std::fmt;

use chrono::NaiveDate;

/// One cell as read from the source, before schema mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    /// Spreadsheet error value such as `#N/A`.
    Error(String),
}

impl RawCell {
    /// Text cell, or [`RawCell::Empty`] when blank after trimming.
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim().trim_matches('\u{feff}');
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(value) | Self::Error(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

static EMPTY: RawCell = RawCell::Empty;

/// A data row with its 1-based position among the source's data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn cell(&self, index: usize) -> &RawCell {
        self.cells.get(index).unwrap_or(&EMPTY)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(RawCell::is_empty)
    }
}

/// Header row plus data rows of a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}
