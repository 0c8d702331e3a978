//! Paragraph-level duplicate detection.
//!
//! Detection runs in two tiers, per text and per corpus entry:
//! 1. **Exact match**: SHA256 hash of the normalized paragraph
//! 2. **Near duplicate**: Jaccard similarity of 5-word shingle sets
//!
//! A pair reported as exact is never reported again as similar.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    DuplicateDetectionService                     │
//! │  ┌────────────────────────────────────────────┐  ┌────────────┐  │
//! │  │ DuplicateDetector                          │  │ CorpusStore│  │
//! │  │  Segmenter ─► ExactMatchDetector ─┐        │  │            │  │
//! │  │            └► NearDuplicateDetector ─► Report  │ SQLite /   │  │
//! │  │  CrossCorpusComparator (rayon) ───┘        │  │ memory     │  │
//! │  └────────────────────────────────────────────┘  └────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use paradup::services::deduplication::{DuplicateDetectionService, DuplicateDetector};
//! use paradup::{MatchKind, MemoryCorpusStore, Scope};
//! use std::sync::Arc;
//!
//! let service = DuplicateDetectionService::new(
//!     Arc::new(MemoryCorpusStore::new()),
//!     DuplicateDetector::default(),
//! );
//!
//! service.submit("Stored once.\nSomething else.", "alice")?;
//! let report = service.check("Stored once.", &Scope::owner("alice"))?;
//! assert_eq!(report.external[0].kind, MatchKind::Exact);
//! # Ok::<(), paradup::Error>(())
//! ```

pub(crate) mod config;
mod corpus;
mod detector;
mod exact_match;
mod hasher;
pub(crate) mod near_duplicate;
mod report;
mod segmenter;
mod service;
mod shingle;
mod types;

pub use config::{
    DEFAULT_LONG_PARAGRAPH_CHARS, DEFAULT_SHINGLE_SIZE, DEFAULT_SIMILARITY_THRESHOLD,
    DetectionSettings,
};
pub use corpus::CrossCorpusComparator;
pub use detector::DuplicateDetector;
pub use exact_match::{ExactMatchDetector, HashIndex};
pub use hasher::ContentHasher;
pub use near_duplicate::{NearDuplicateDetector, PairScanner, SimilarPair};
pub use report::build_report;
pub use segmenter::Segmenter;
pub use service::{DuplicateDetectionService, Submission};
pub use shingle::{ShingleSet, jaccard};
pub use types::WithinTextResult;
