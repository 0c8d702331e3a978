//! Corpus store trait.

use crate::Result;
use crate::models::{CorpusEntry, DuplicateReport, EntryId, Scope, TextEntry};

/// Trait for stores of previously submitted texts.
///
/// Implementations must be safe to share between threads; detection reads
/// the corpus while other requests may be saving to it.
///
/// # Implementor Notes
///
/// - `find_entries` returns entries in insertion order, so reports are stable
///   across calls
/// - `list` returns newest first, ties broken by insertion order (latest first)
/// - Read failures must be returned as errors, never as an empty corpus
pub trait CorpusStore: Send + Sync {
    /// Returns every entry visible in `scope`, in insertion order.
    fn find_entries(&self, scope: &Scope) -> Result<Vec<CorpusEntry>>;

    /// Stores a new entry.
    fn save(&self, entry: &TextEntry) -> Result<()>;

    /// Replaces the stored duplicate report of an entry.
    ///
    /// Returns [`crate::Error::NotFound`] if the entry does not exist.
    fn update_duplicate_metadata(&self, id: &EntryId, report: &DuplicateReport) -> Result<()>;

    /// Retrieves an entry if it exists and is visible in `scope`.
    fn get(&self, id: &EntryId, scope: &Scope) -> Result<Option<TextEntry>>;

    /// Lists entries in `scope`, newest first, skipping `offset` and returning
    /// at most `limit`.
    fn list(&self, scope: &Scope, offset: usize, limit: usize) -> Result<Vec<TextEntry>>;

    /// Returns the number of entries visible in `scope`.
    fn count(&self, scope: &Scope) -> Result<usize> {
        Ok(self.find_entries(scope)?.len())
    }
}
