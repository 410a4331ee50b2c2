//! Schema detection and mapping of raw rows to sales records.

use std::path::Path;

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use tracing::{debug, warn};

use sales_model::{Field, ProfileMatch, SalesRecord, SchemaProfile, header_key};

use crate::error::{IngestError, Result};
use crate::parse::{
    ParseResult, parse_date, parse_dollars, parse_quantity, parse_required_text, parse_text,
};
use crate::raw::{RawCell, RawRow, RawTable};

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_MIN_SIMILARITY: f64 = 0.85;

/// Resolves the header row against the profiles in order.
///
/// Among complete matches the one resolving the most columns wins, ties
/// going to the earlier profile. When none is complete the error names the
/// profile missing the fewest required fields, with close header spellings.
pub fn detect_profile(
    source_name: &str,
    headers: &[String],
    profiles: &[SchemaProfile],
) -> Result<ProfileMatch> {
    let mut best: Option<ProfileMatch> = None;
    let mut closest: Option<(&SchemaProfile, ProfileMatch)> = None;
    for profile in profiles {
        let matched = profile.resolve(headers);
        if matched.is_complete() {
            if best
                .as_ref()
                .is_none_or(|best| matched.columns.len() > best.columns.len())
            {
                best = Some(matched);
            }
            continue;
        }
        let better = closest
            .as_ref()
            .is_none_or(|(_, best)| matched.missing.len() < best.missing.len());
        if better {
            closest = Some((profile, matched));
        }
    }

    if let Some(matched) = best {
        debug!(
            source = %source_name,
            profile = %matched.profile,
            columns = matched.columns.len(),
            "schema profile matched"
        );
        return Ok(matched);
    }
    let Some((profile, matched)) = closest else {
        return Err(IngestError::SchemaMismatch {
            source_name: source_name.to_string(),
            profile: "(none)".to_string(),
            missing: Field::REQUIRED.to_vec(),
            suggestions: Vec::new(),
        });
    };
    let suggestions = suggest_headers(profile, &matched.missing, headers);
    Err(IngestError::SchemaMismatch {
        source_name: source_name.to_string(),
        profile: matched.profile,
        missing: matched.missing,
        suggestions,
    })
}

/// Best-scoring source header per missing field, when close enough.
fn suggest_headers(
    profile: &SchemaProfile,
    missing: &[Field],
    headers: &[String],
) -> Vec<(Field, String)> {
    missing
        .iter()
        .filter_map(|&field| {
            let mut best: Option<(f64, &String)> = None;
            for alias in profile.aliases(field) {
                let alias = header_key(alias);
                for header in headers {
                    let score = jaro_similarity(alias.chars(), header_key(header).chars());
                    if score >= SUGGESTION_MIN_SIMILARITY
                        && best.is_none_or(|(top, _)| score > top)
                    {
                        best = Some((score, header));
                    }
                }
            }
            best.map(|(_, header)| (field, header.clone()))
        })
        .collect()
}

/// Maps every data row to a record. Blank rows are skipped; the first cell
/// that fails to parse fails the whole load.
pub fn map_records(
    source_name: &str,
    raw: &RawTable,
    matched: &ProfileMatch,
) -> Result<Vec<SalesRecord>> {
    let mapper = RowMapper {
        source_name,
        raw,
        matched,
    };
    let mut records = Vec::with_capacity(raw.rows.len());
    let mut skipped = 0usize;
    for row in &raw.rows {
        if row.is_blank() {
            skipped += 1;
            continue;
        }
        records.push(mapper.map_row(row)?);
    }
    if skipped > 0 {
        warn!(source = %source_name, skipped, "skipped blank rows");
    }
    Ok(records)
}

struct RowMapper<'a> {
    source_name: &'a str,
    raw: &'a RawTable,
    matched: &'a ProfileMatch,
}

impl RowMapper<'_> {
    fn map_row(&self, row: &RawRow) -> Result<SalesRecord> {
        let invoice_date = self.required(row, Field::InvoiceDate, parse_date)?;
        let segment = self.required(row, Field::Segment, parse_required_text)?;
        let customer = self.required(row, Field::Customer, parse_required_text)?;
        let dollars = self.required(row, Field::Dollars, parse_dollars)?;

        let mut record = SalesRecord::new(invoice_date, segment, customer, dollars);
        record.parent_customer = self.optional(row, Field::ParentCustomer, parse_text)?.flatten();
        record.item_description = self
            .optional(row, Field::ItemDescription, parse_text)?
            .flatten();
        record.table = self.optional(row, Field::Table, parse_text)?.flatten();
        record.mfg_number = self.optional(row, Field::MfgNumber, parse_text)?.flatten();
        record.qty_ordered = self.optional(row, Field::QtyOrdered, parse_quantity)?;
        record.qty_received = self.optional(row, Field::QtyReceived, parse_quantity)?;
        Ok(record)
    }

    fn required<T>(
        &self,
        row: &RawRow,
        field: Field,
        parse: fn(&RawCell) -> ParseResult<T>,
    ) -> Result<T> {
        match self.optional(row, field, parse)? {
            Some(value) => Ok(value),
            // Required fields are resolved before mapping starts.
            None => Err(self.malformed(row, field, "column not mapped")),
        }
    }

    /// `None` when the source has no column for the field.
    fn optional<T>(
        &self,
        row: &RawRow,
        field: Field,
        parse: fn(&RawCell) -> ParseResult<T>,
    ) -> Result<Option<T>> {
        let Some(index) = self.matched.index_of(field) else {
            return Ok(None);
        };
        parse(row.cell(index))
            .map(Some)
            .map_err(|reason| self.malformed(row, field, reason))
    }

    fn malformed(&self, row: &RawRow, field: Field, reason: &'static str) -> IngestError {
        let index = self.matched.index_of(field);
        IngestError::MalformedRow {
            source_name: self.source_name.to_string(),
            row: row.number,
            column: index
                .and_then(|index| self.raw.headers.get(index).cloned())
                .unwrap_or_else(|| field.default_header().to_string()),
            value: index.map(|index| row.cell(index).to_string()).unwrap_or_default(),
            reason,
        }
    }
}

/// Reads extra profiles from a JSON array and appends them to the built-ins.
pub fn load_profiles(path: &Path) -> Result<Vec<SchemaProfile>> {
    let config_error = |message: String| IngestError::ProfileConfig {
        path: path.to_path_buf(),
        message,
    };
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let extra: Vec<SchemaProfile> =
        serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))?;

    let mut profiles = SchemaProfile::builtin();
    for profile in extra {
        profile.validate().map_err(|e| config_error(e.to_string()))?;
        if profiles.iter().any(|known| known.name == profile.name) {
            return Err(config_error(format!(
                "profile '{}' is defined more than once",
                profile.name
            )));
        }
        profiles.push(profile);
    }
    debug!(path = %path.display(), count = profiles.len(), "schema profiles loaded");
    Ok(profiles)
}
