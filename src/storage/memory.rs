//! In-memory corpus store.

use super::traits::CorpusStore;
use crate::models::{CorpusEntry, DuplicateReport, EntryId, Scope, TextEntry};
use crate::{Error, Result};
use std::sync::{PoisonError, RwLock};

/// Corpus store kept entirely in memory.
///
/// Entries are kept in insertion order. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCorpusStore {
    entries: RwLock<Vec<TextEntry>>,
}

impl MemoryCorpusStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with entries.
    #[must_use]
    pub fn with_entries(entries: Vec<TextEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl CorpusStore for MemoryCorpusStore {
    fn find_entries(&self, scope: &Scope) -> Result<Vec<CorpusEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries
            .iter()
            .filter(|e| scope.includes(&e.owner))
            .map(TextEntry::to_corpus_entry)
            .collect())
    }

    fn save(&self, entry: &TextEntry) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(Error::InvalidInput(format!("entry {} already exists", entry.id)));
        }
        entries.push(entry.clone());
        Ok(())
    }

    fn update_duplicate_metadata(&self, id: &EntryId, report: &DuplicateReport) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| Error::NotFound(format!("text entry {id}")))?;
        entry.duplicates = report.clone();
        Ok(())
    }

    fn get(&self, id: &EntryId, scope: &Scope) -> Result<Option<TextEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries
            .iter()
            .find(|e| &e.id == id && scope.includes(&e.owner))
            .cloned())
    }

    fn list(&self, scope: &Scope, offset: usize, limit: usize) -> Result<Vec<TextEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut visible: Vec<&TextEntry> = entries
            .iter()
            .rev()
            .filter(|e| scope.includes(&e.owner))
            .collect();
        // Stable: equal timestamps keep the latest insertion first.
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, scope: &Scope) -> Result<usize> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.iter().filter(|e| scope.includes(&e.owner)).count())
    }
}

/// A store whose every operation fails, for exercising error paths.
#[cfg(test)]
pub(crate) struct FailingCorpusStore;

#[cfg(test)]
impl FailingCorpusStore {
    fn fail<T>(operation: &str) -> Result<T> {
        Err(Error::operation(operation, "store unavailable"))
    }
}

#[cfg(test)]
impl CorpusStore for FailingCorpusStore {
    fn find_entries(&self, _scope: &Scope) -> Result<Vec<CorpusEntry>> {
        Self::fail("find_entries")
    }

    fn save(&self, _entry: &TextEntry) -> Result<()> {
        Self::fail("save")
    }

    fn update_duplicate_metadata(&self, _id: &EntryId, _report: &DuplicateReport) -> Result<()> {
        Self::fail("update_duplicate_metadata")
    }

    fn get(&self, _id: &EntryId, _scope: &Scope) -> Result<Option<TextEntry>> {
        Self::fail("get")
    }

    fn list(&self, _scope: &Scope, _offset: usize, _limit: usize) -> Result<Vec<TextEntry>> {
        Self::fail("list")
    }
}
