//! Sales dataset loading.
//!
//! Reads a delimited file or one workbook sheet into a [`SalesTable`]:
//!
//! - **Readers**: delimited text through Polars, workbooks through calamine;
//!   both produce an untyped grid with every cell kept as read
//! - **Schema mapping**: the header row is resolved against
//!   [`SchemaProfile`]s and each row is parsed into a canonical record
//! - **Cache**: [`DatasetCache`] memoizes loaded tables per [`SourceLocator`]
//!
//! # Example
//!
//! ```ignore
//! use sales_ingest::{DatasetCache, SourceLocator};
//!
//! let cache = DatasetCache::default();
//! let table = cache.get_or_load(&SourceLocator::from_path("sales.csv"))?;
//! println!("{} rows", table.len());
//! ```
//!
//! [`SalesTable`]: sales_model::SalesTable
//! [`SchemaProfile`]: sales_model::SchemaProfile

mod cache;
mod delimited;
mod error;
mod loader;
mod parse;
mod raw;
mod schema;
mod source;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Sources ===
pub use source::{ColumnRange, SourceKind, SourceLocator, column_index, column_letters};

// === Loading ===
pub use cache::DatasetCache;
pub use loader::{load_source, load_upload};
pub use schema::{detect_profile, load_profiles};
