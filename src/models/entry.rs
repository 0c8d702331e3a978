//! Stored texts and the corpus view of them.

use super::DuplicateReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a stored text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Creates an entry ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random (UUID v4) ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which stored texts a query can see.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Only texts submitted by this owner.
    Owner(String),
    /// Every stored text (used by crawl comparisons).
    All,
}

impl Scope {
    /// Creates an owner scope.
    #[must_use]
    pub fn owner(owner: impl Into<String>) -> Self {
        Self::Owner(owner.into())
    }

    /// Returns true if an entry owned by `owner` is visible in this scope.
    #[must_use]
    pub fn includes(&self, owner: &str) -> bool {
        match self {
            Self::Owner(o) => o == owner,
            Self::All => true,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner(o) => write!(f, "owner:{o}"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Read-only snapshot of one stored text, used for a single comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    /// Entry identifier.
    pub id: EntryId,
    /// Full stored content.
    pub content: String,
}

impl CorpusEntry {
    /// Creates a corpus entry.
    #[must_use]
    pub fn new(id: impl Into<EntryId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// A persisted submission together with its duplicate report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Submitting owner.
    pub owner: String,
    /// Submitted content.
    pub content: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Report computed at submission time.
    pub duplicates: DuplicateReport,
}

impl TextEntry {
    /// Creates a new entry with a fresh ID and the current timestamp.
    #[must_use]
    pub fn new(owner: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: EntryId::generate(),
            owner: owner.into(),
            content: content.into(),
            created_at: Utc::now(),
            duplicates: DuplicateReport::default(),
        }
    }

    /// Sets the duplicate report.
    #[must_use]
    pub fn with_duplicates(mut self, duplicates: DuplicateReport) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Returns the corpus view of this entry.
    #[must_use]
    pub fn to_corpus_entry(&self) -> CorpusEntry {
        CorpusEntry {
            id: self.id.clone(),
            content: self.content.clone(),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub entries: Vec<T>,
    /// 1-based page number.
    pub current_page: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total_entries: usize,
}

impl<T> Page<T> {
    /// Builds page metadata for `total` items split into pages of `limit`.
    #[must_use]
    pub const fn new(entries: Vec<T>, current_page: usize, limit: usize, total: usize) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            entries,
            current_page,
            total_pages,
            total_entries: total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_scope_includes() {
        assert!(Scope::owner("alice").includes("alice"));
        assert!(!Scope::owner("alice").includes("bob"));
        assert!(Scope::All.includes("bob"));
    }

    #[test]
    fn test_page_math() {
        let page: Page<u8> = Page::new(vec![], 1, 10, 21);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_entries, 21);

        let empty: Page<u8> = Page::new(vec![], 1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_text_entry_to_corpus_entry() {
        let entry = TextEntry::new("alice", "Hello");
        let corpus = entry.to_corpus_entry();
        assert_eq!(corpus.id, entry.id);
        assert_eq!(corpus.content, "Hello");
        assert!(entry.duplicates.is_empty());
    }
}
