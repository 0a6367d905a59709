//! Name-score reuse across files with identical headers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::engine::NameScores;

type CacheKey = (String, Vec<String>);

/// Thread-safe cache of [`NameScores`] keyed by schema name and header row.
///
/// Only the header-dependent half of mapping is cached. Content sniffing and
/// assignment still run against each file's own samples, so a file maps the
/// same way whether or not another file filled the cache first.
#[derive(Debug, Default)]
pub struct MappingCache {
    entries: Mutex<HashMap<CacheKey, Arc<NameScores>>>,
}

impl MappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, schema: &str, header: &[String]) -> Option<Arc<NameScores>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(&(schema.to_string(), header.to_vec())).cloned()
    }

    /// Return the cached scores or compute, store and return new ones.
    pub fn get_or_insert_with<F>(&self, schema: &str, header: &[String], compute: F) -> Arc<NameScores>
    where
        F: FnOnce() -> NameScores,
    {
        let key = (schema.to_string(), header.to_vec());
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert_with(|| Arc::new(compute())))
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
