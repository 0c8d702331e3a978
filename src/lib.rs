//! # Paradup
//!
//! Paragraph-level duplicate detection for submitted texts.
//!
//! Paradup splits a text into paragraphs and reports:
//!
//! - **Internal duplicates**: later paragraphs that repeat or closely resemble
//!   an earlier paragraph of the same text
//! - **External duplicates**: paragraphs that repeat or closely resemble a
//!   paragraph of a previously stored text
//!
//! Exact matches are found by SHA-256 content hashing. Near-duplicates are
//! found by 5-word shingling and Jaccard similarity with a 0.8 threshold.
//! The same comparison is applied to text fetched from web pages.
//!
//! ## Example
//!
//! ```rust
//! use paradup::{CorpusEntry, DuplicateDetector, MatchKind};
//!
//! let detector = DuplicateDetector::default();
//! let within = detector.detect_within_text("A.\nA.");
//! assert_eq!(within.internal_matches.len(), 1);
//! assert_eq!(within.internal_matches[0].kind, MatchKind::Exact);
//!
//! let corpus = vec![CorpusEntry::new("stored-1", "X")];
//! let external = detector.detect_against_corpus(&detector.detect_within_text("X"), &corpus);
//! assert_eq!(external[0].kind, MatchKind::Exact);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod crawler;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::{CrawlSettings, DetectionSettings, ParadupConfig};
pub use crawler::{ContentFetcher, CrawlService, HttpContentFetcher};
pub use models::{
    BatchItem, BatchOutcome, ContentHash, CorpusEntry, DuplicateMatch, DuplicateReport, EntryId,
    ExternalMatch, FetchOutcome, FetchResult, InternalMatch, MatchKind, Page, ParagraphUnit,
    Scope, TextEntry,
};
pub use services::deduplication::{
    DuplicateDetectionService, DuplicateDetector, Submission, WithinTextResult,
};
pub use storage::{CorpusStore, MemoryCorpusStore, SqliteCorpusStore};

/// Error type for paradup operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Non-UTF-8 content, blank submissions, empty URL lists, bad pagination |
/// | `NotFound` | A stored entry is missing or not visible to the requesting owner |
/// | `OperationFailed` | Corpus store I/O, `SQLite` errors, HTTP client setup, logging init |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised before any hashing takes place, so no partial work is done.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested entry does not exist in the caller's scope.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation failed.
    ///
    /// A corpus read failure aborts the whole comparison request: an
    /// incomplete scan would under-report duplicates.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Shorthand for building an [`Error::OperationFailed`].
    pub fn operation(operation: impl Into<String>, cause: impl ToString) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for paradup operations.
pub type Result<T> = std::result::Result<T, Error>;
