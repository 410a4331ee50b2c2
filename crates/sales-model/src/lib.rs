pub mod aggregate;
pub mod error;
pub mod field;
pub mod profile;
pub mod record;
pub mod selection;

pub use aggregate::{
    AggregateRow, DashboardOptions, DashboardSummary, ParentKey, ParentSegmentKey, Totals,
    WeeklyTotal, YearOverYear,
};
pub use error::{ModelError, Result};
pub use field::{ColumnSpec, Field};
pub use profile::{
    ColumnAliases, ProfileMatch, ResolvedColumn, SchemaProfile, header_key, normalize_header,
};
pub use record::{CellValue, SalesRecord, SalesTable};
pub use selection::FilterSelection;
