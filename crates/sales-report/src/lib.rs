//! Export of filtered sales subsets.
//!
//! The export is delimited text with a header row, in the display column
//! order of the source. Dates are written as ISO-8601 calendar dates and
//! amounts with the shortest text that reads back to the same value, so a
//! loaded export yields the same rows.

mod error;
mod export;

pub use error::{ReportError, Result};
pub use export::{CSV_CONTENT_TYPE, ExportPayload, encode_csv, export_file_name};
