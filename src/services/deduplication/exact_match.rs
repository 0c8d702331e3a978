//! Exact match detection.
//!
//! Detects identical paragraphs by comparing SHA256 content hashes. A single
//! left-to-right pass records the first occurrence of every hash; each later
//! occurrence is reported against that first one, so chains of duplicates all
//! point at the same original.

use super::hasher::ContentHasher;
use crate::models::{ContentHash, InternalMatch, MatchKind, ParagraphUnit};
use std::collections::HashMap;
use tracing::instrument;

/// Maps each distinct paragraph hash to the index of its first occurrence.
///
/// Built once per submitted text and consulted read-only while comparing
/// against every corpus entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashIndex {
    first_seen: HashMap<ContentHash, usize>,
}

impl HashIndex {
    /// Returns the index of the first paragraph with this hash.
    #[must_use]
    pub fn first_index(&self, hash: &ContentHash) -> Option<usize> {
        self.first_seen.get(hash).copied()
    }

    /// Returns the first-occurrence index of a paragraph with this text, if any.
    ///
    /// Blank text never matches.
    #[must_use]
    pub fn lookup(&self, text: &str) -> Option<usize> {
        if text.trim().is_empty() {
            return None;
        }
        self.first_index(&ContentHasher::hash(text))
    }

    /// Number of distinct hashes recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    /// Returns true if no hashes were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Iterates `(hash, first_index)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContentHash, usize)> {
        self.first_seen.iter().map(|(h, i)| (h, *i))
    }
}

/// Detector for identical paragraphs within one text.
///
/// # Example
///
/// ```rust
/// use paradup::services::deduplication::{ExactMatchDetector, Segmenter};
///
/// let units = Segmenter::default().segment("A.\nB.\nA.\nA.");
/// let (index, matches) = ExactMatchDetector::scan(&units);
///
/// assert_eq!(index.len(), 2);
/// assert_eq!(matches.len(), 2);
/// assert!(matches.iter().all(|m| m.original_index == 0));
/// ```
pub struct ExactMatchDetector;

impl ExactMatchDetector {
    /// Scans paragraphs once, returning the hash index and every later repeat.
    ///
    /// Blank paragraphs are neither recorded nor reported.
    #[must_use]
    #[instrument(skip(paragraphs), fields(operation = "exact_match_scan", paragraphs = paragraphs.len()))]
    pub fn scan(paragraphs: &[ParagraphUnit]) -> (HashIndex, Vec<InternalMatch>) {
        let mut index = HashIndex::default();
        let mut matches = Vec::new();

        for unit in paragraphs.iter().filter(|u| !u.is_blank()) {
            let hash = ContentHasher::hash(&unit.text);
            match index.first_seen.get(&hash) {
                Some(&original_index) => matches.push(InternalMatch {
                    index: unit.index,
                    paragraph: unit.text.clone(),
                    original_index,
                    kind: MatchKind::Exact,
                }),
                None => {
                    index.first_seen.insert(hash, unit.index);
                },
            }
        }

        tracing::debug!(
            distinct = index.len(),
            repeats = matches.len(),
            "Exact match scan complete"
        );
        (index, matches)
    }
}
