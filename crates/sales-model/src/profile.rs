//! Schema profiles: how a source variant names the canonical columns.
//!
//! The dashboard sources are near-duplicates exported with different
//! headers ("Segment Description 2" vs "Market Segment", "Customer Name" vs
//! "Customer"). A profile lists the accepted headers per [`Field`]; loading a
//! source resolves its header row against the profiles once, and everything
//! downstream works on canonical fields only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::{ColumnSpec, Field};

/// Accepted header spellings for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAliases {
    pub field: Field,
    pub aliases: Vec<String>,
}

/// Named column mapping for one source variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProfile {
    pub name: String,
    pub columns: Vec<ColumnAliases>,
}

/// A field resolved to a header position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub field: Field,
    pub index: usize,
    pub header: String,
}

/// Outcome of resolving a header row against one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMatch {
    pub profile: String,
    /// Resolved columns in [`Field::ALL`] order.
    pub columns: Vec<ResolvedColumn>,
    /// Required fields with no matching header.
    pub missing: Vec<Field>,
}

impl ProfileMatch {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .find(|column| column.field == field)
            .map(|column| column.index)
    }

    /// Display columns of the loaded table.
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        self.columns
            .iter()
            .map(|column| ColumnSpec::new(column.field, column.header.clone()))
            .collect()
    }
}

impl SchemaProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_column<S: Into<String>>(
        mut self,
        field: Field,
        aliases: impl IntoIterator<Item = S>,
    ) -> Self {
        self.columns.push(ColumnAliases {
            field,
            aliases: aliases.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// The "dot sales" workbook export.
    pub fn dot_sales() -> Self {
        Self::new("dot_sales")
            .with_column(Field::Table, ["Table"])
            .with_column(Field::InvoiceDate, ["Invoice Date"])
            .with_column(Field::ParentCustomer, ["Parent Customer"])
            .with_column(Field::Customer, ["Customer Name"])
            .with_column(Field::MfgNumber, ["MFG #"])
            .with_column(Field::ItemDescription, ["Item Full Description"])
            .with_column(Field::QtyOrdered, ["Qty Ordered"])
            .with_column(Field::QtyReceived, ["Qty Received"])
            .with_column(Field::Dollars, ["Dollars"])
            .with_column(Field::Segment, ["Segment Description 2"])
    }

    /// The delimited exports keyed by "Market Segment".
    pub fn market_segment() -> Self {
        Self::new("market_segment")
            .with_column(Field::InvoiceDate, ["Invoice Date", "Date"])
            .with_column(Field::ParentCustomer, ["Parent Customer", "Parent"])
            .with_column(Field::Customer, ["Customer", "Distributor"])
            .with_column(
                Field::ItemDescription,
                ["Item Description", "Item Full Description"],
            )
            .with_column(Field::Dollars, ["Dollars", "Sales", "Amount"])
            .with_column(Field::Segment, ["Market Segment", "Segment"])
    }

    /// Profile accepting the canonical default headers.
    pub fn canonical() -> Self {
        Field::ALL
            .into_iter()
            .fold(Self::new("canonical"), |profile, field| {
                profile.with_column(field, [field.default_header()])
            })
    }

    /// Built-in profiles in resolution order.
    pub fn builtin() -> Vec<Self> {
        vec![Self::dot_sales(), Self::market_segment(), Self::canonical()]
    }

    pub fn aliases(&self, field: Field) -> &[String] {
        self.columns
            .iter()
            .find(|column| column.field == field)
            .map_or(&[], |column| column.aliases.as_slice())
    }

    /// Checks that required fields have aliases and no field is listed twice.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ModelError::InvalidProfile {
            name: self.name.clone(),
            reason,
        };
        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if !seen.insert(column.field) {
                return Err(invalid(format!("field '{}' listed twice", column.field)));
            }
            if column.aliases.iter().all(|alias| alias.trim().is_empty()) {
                return Err(invalid(format!("field '{}' has no aliases", column.field)));
            }
        }
        for field in Field::REQUIRED {
            if !seen.contains(&field) {
                return Err(invalid(format!("required field '{field}' is not mapped")));
            }
        }
        Ok(())
    }

    /// Resolves a header row. Matching ignores case and repeated whitespace;
    /// the first header matching any alias wins.
    pub fn resolve(&self, headers: &[String]) -> ProfileMatch {
        let keys: Vec<String> = headers.iter().map(|header| header_key(header)).collect();
        let mut columns = Vec::new();
        let mut missing = Vec::new();
        for field in Field::ALL {
            let found = self.aliases(field).iter().find_map(|alias| {
                let alias = header_key(alias);
                keys.iter().position(|key| *key == alias)
            });
            match found {
                Some(index) => columns.push(ResolvedColumn {
                    field,
                    index,
                    header: normalize_header(&headers[index]),
                }),
                None if field.is_required() => missing.push(field),
                None => {}
            }
        }
        ProfileMatch {
            profile: self.name.clone(),
            columns,
            missing,
        }
    }
}

/// Trims a header, strips a byte-order mark and collapses inner whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key for header matching.
pub fn header_key(raw: &str) -> String {
    normalize_header(raw).to_lowercase()
}
