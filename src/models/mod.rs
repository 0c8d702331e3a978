//! Data models for paradup.
//!
//! This module contains the core data structures shared by the detectors,
//! the corpus store, and the crawl flow.

mod crawl;
mod entry;
mod matches;
mod paragraph;
mod report;

pub use crawl::{BatchItem, BatchOutcome, FetchOutcome, FetchResult, NO_CONTENT_MARKER};
pub use entry::{CorpusEntry, EntryId, Page, Scope, TextEntry};
pub use matches::{DuplicateMatch, ExternalMatch, InternalMatch, MatchKind};
pub use paragraph::{ContentHash, ParagraphUnit};
pub use report::DuplicateReport;
