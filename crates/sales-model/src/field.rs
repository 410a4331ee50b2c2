//! Canonical columns of a sales record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical sales column, independent of the header a source file uses.
///
/// Declaration order is the default display order of the rows table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Source table label the line was exported from.
    Table,
    InvoiceDate,
    ParentCustomer,
    Customer,
    MfgNumber,
    ItemDescription,
    QtyOrdered,
    QtyReceived,
    Dollars,
    Segment,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 10] = [
        Field::Table,
        Field::InvoiceDate,
        Field::ParentCustomer,
        Field::Customer,
        Field::MfgNumber,
        Field::ItemDescription,
        Field::QtyOrdered,
        Field::QtyReceived,
        Field::Dollars,
        Field::Segment,
    ];

    /// Fields every source must provide.
    pub const REQUIRED: [Field; 4] = [
        Field::InvoiceDate,
        Field::Segment,
        Field::Customer,
        Field::Dollars,
    ];

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// Snake-case identifier used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::InvoiceDate => "invoice_date",
            Self::ParentCustomer => "parent_customer",
            Self::Customer => "customer",
            Self::MfgNumber => "mfg_number",
            Self::ItemDescription => "item_description",
            Self::QtyOrdered => "qty_ordered",
            Self::QtyReceived => "qty_received",
            Self::Dollars => "dollars",
            Self::Segment => "segment",
        }
    }

    /// Human-readable header used when a source does not supply one.
    pub fn default_header(self) -> &'static str {
        match self {
            Self::Table => "Table",
            Self::InvoiceDate => "Invoice Date",
            Self::ParentCustomer => "Parent Customer",
            Self::Customer => "Customer",
            Self::MfgNumber => "MFG #",
            Self::ItemDescription => "Item Description",
            Self::QtyOrdered => "Qty Ordered",
            Self::QtyReceived => "Qty Received",
            Self::Dollars => "Dollars",
            Self::Segment => "Market Segment",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field as it appears in a loaded table: the canonical field plus the
/// header text the source used for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: Field,
    pub header: String,
}

impl ColumnSpec {
    pub fn new(field: Field, header: impl Into<String>) -> Self {
        Self {
            field,
            header: header.into(),
        }
    }

    /// Column spec using the field's default header.
    pub fn canonical(field: Field) -> Self {
        Self::new(field, field.default_header())
    }
}
