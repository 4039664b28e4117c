//! In-memory catalog for tests, demos and small deployments.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use parking_lot::RwLock;

use crate::catalog::entry::CatalogEntry;
use crate::catalog::{CatalogFilter, CatalogStore};
use crate::error::{PhonewiseError, Result};
use crate::util::fuzzy::TokenSortMatcher;

/// Catalog held in a `Vec`, preserving insertion order for stable ties.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        InMemoryCatalog {
            entries: RwLock::new(entries),
        }
    }

    /// Load a JSON array of entries. Duplicate ids are rejected.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PhonewiseError::catalog(format!("Failed to read {}: {e}", path.display()))
        })?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(PhonewiseError::catalog(format!(
                    "Duplicate phone id {} in {}",
                    entry.id,
                    path.display()
                )));
            }
        }

        Ok(Self::from_entries(entries))
    }

    /// Add an entry, or replace the one with the same id in place.
    pub fn insert(&self, entry: CatalogEntry) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Remove an entry by id.
    pub fn remove(&self, id: u64) -> Option<CatalogEntry> {
        let mut entries = self.entries.write();
        let index = entries.iter().position(|e| e.id == id)?;
        Some(entries.remove(index))
    }
}

impl CatalogStore for InMemoryCatalog {
    fn find_active(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>> {
        let entries = self.entries.read();
        Ok(entries
            .iter()
            .filter(|entry| entry.is_active && filter.matches(entry))
            .cloned()
            .collect())
    }

    fn get_by_id(&self, id: u64) -> Result<Option<CatalogEntry>> {
        let entries = self.entries.read();
        Ok(entries.iter().find(|entry| entry.id == id).cloned())
    }

    fn fuzzy_search_models(&self, query: &str, limit: usize) -> Result<Vec<(CatalogEntry, f64)>> {
        if query.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let matcher = TokenSortMatcher::new(query);
        let entries = self.entries.read();
        let mut scored: Vec<(CatalogEntry, f64)> = entries
            .iter()
            .filter(|entry| entry.is_active)
            .filter_map(|entry| {
                let score = matcher.score(&entry.display_name());
                (score > 0.0).then(|| (entry.clone(), score))
            })
            .collect();

        // stable: equal scores keep catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);
        Ok(scored)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }
}
