//! Loaded-table cache keyed by source locator.
//!
//! A loaded table is immutable, so it is shared as `Arc<SalesTable>` and
//! only the map itself is behind a lock. Entries live until invalidated.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use sales_model::{SalesTable, SchemaProfile};

use crate::error::Result;
use crate::loader::{load_source, load_upload};
use crate::source::SourceLocator;

/// Memoizes loaded tables per distinct [`SourceLocator`].
#[derive(Debug)]
pub struct DatasetCache {
    profiles: Vec<SchemaProfile>,
    tables: RwLock<HashMap<SourceLocator, Arc<SalesTable>>>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(SchemaProfile::builtin())
    }
}

impl DatasetCache {
    pub fn new(profiles: Vec<SchemaProfile>) -> Self {
        Self {
            profiles,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn profiles(&self) -> &[SchemaProfile] {
        &self.profiles
    }

    /// Returns the cached table, loading it on first use. Failed loads are
    /// not cached.
    pub fn get_or_load(&self, locator: &SourceLocator) -> Result<Arc<SalesTable>> {
        if let Some(table) = self.get(locator) {
            debug!(source = %locator.display_name(), "dataset cache hit");
            return Ok(table);
        }
        debug!(source = %locator.display_name(), "dataset cache miss");
        let table = Arc::new(load_source(locator, &self.profiles)?);
        Ok(self.insert(locator.clone(), table))
    }

    /// Same as [`Self::get_or_load`] for an uploaded dataset. Identical bytes
    /// under the same name hit the cache.
    pub fn get_or_load_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
        sheet: Option<String>,
    ) -> Result<(SourceLocator, Arc<SalesTable>)> {
        let locator = SourceLocator::upload(file_name, bytes, sheet.clone());
        if let Some(table) = self.get(&locator) {
            debug!(source = %file_name, "dataset cache hit");
            return Ok((locator, table));
        }
        debug!(source = %file_name, "dataset cache miss");
        let (locator, table) = load_upload(file_name, bytes, sheet, &self.profiles)?;
        let table = self.insert(locator.clone(), Arc::new(table));
        Ok((locator, table))
    }

    pub fn get(&self, locator: &SourceLocator) -> Option<Arc<SalesTable>> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.get(locator).cloned())
    }

    /// Drops one entry. Returns whether it was cached.
    pub fn invalidate(&self, locator: &SourceLocator) -> bool {
        let removed = self
            .tables
            .write()
            .map(|mut tables| tables.remove(locator).is_some())
            .unwrap_or(false);
        debug!(source = %locator.display_name(), removed, "dataset cache invalidated");
        removed
    }

    pub fn clear(&self) {
        if let Ok(mut tables) = self.tables.write() {
            debug!(entries = tables.len(), "dataset cache cleared");
            tables.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.tables.read().map(|tables| tables.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps the first table stored under a locator so concurrent loads of
    /// the same source hand out one `Arc`.
    fn insert(&self, locator: SourceLocator, table: Arc<SalesTable>) -> Arc<SalesTable> {
        match self.tables.write() {
            Ok(mut tables) => Arc::clone(tables.entry(locator).or_insert(table)),
            Err(_) => table,
        }
    }
}
