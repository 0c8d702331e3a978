//! Near-duplicate detection.
//!
//! Two paragraphs are similar when the Jaccard similarity of their shingle
//! sets is at least the threshold and strictly below 1.0. A score of exactly
//! 1.0 is an exact match: usually the exact-match pass has already reported
//! it, but texts with repeated windows can share a shingle set without
//! sharing a hash, so scanners hand those pairs back as [`MatchKind::Exact`].
//!
//! Pair enumeration lives behind [`PairScanner`]. [`NearDuplicateDetector`]
//! implements it by comparing every pair, which is O(n²) within a text
//! and O(n·m) across two texts. That is fine for single submissions against a
//! bounded corpus; larger corpora need a banded or minhash scanner, which can
//! be dropped in without changing the report contract.

use super::config::{DEFAULT_SHINGLE_SIZE, DEFAULT_SIMILARITY_THRESHOLD};
use super::shingle::{ShingleSet, jaccard};
use crate::models::MatchKind;

/// One pair of paragraphs at or above the similarity threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarPair {
    /// Index on the left side (the earlier paragraph within one text).
    pub left: usize,
    /// Index on the right side.
    pub right: usize,
    /// Jaccard similarity, in `[threshold, 1.0]`.
    pub similarity: f64,
}

impl SimilarPair {
    /// Exact for identical shingle sets, similar otherwise.
    #[must_use]
    pub const fn kind(&self) -> MatchKind {
        if self.similarity >= 1.0 {
            MatchKind::Exact
        } else {
            MatchKind::Similar
        }
    }
}

/// Enumerates paragraph pairs and keeps those at or above the threshold.
///
/// Pairs scoring 1.0 are included; callers decide whether the exact-match
/// pass has already covered them.
pub trait PairScanner: Send + Sync {
    /// All unordered pairs `(i, j)` with `i < j` within one text.
    fn within(&self, sets: &[ShingleSet]) -> Vec<SimilarPair>;

    /// All pairs `(i, j)` across two texts, `i` indexing `left`.
    fn across(&self, left: &[ShingleSet], right: &[ShingleSet]) -> Vec<SimilarPair>;
}

/// Shingles paragraphs and classifies pairs by Jaccard similarity.
///
/// # Example
///
/// ```rust
/// use paradup::services::deduplication::NearDuplicateDetector;
///
/// let detector = NearDuplicateDetector::default();
/// let a = "we shipped the release on friday after a long week of testing everything";
/// let b = "we shipped the release on friday after a long week of testing everything twice";
/// assert!(detector.is_similar(a, b));
/// assert!(!detector.is_similar(a, a));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NearDuplicateDetector {
    shingle_size: usize,
    threshold: f64,
}

impl NearDuplicateDetector {
    /// Creates a detector with the given shingle width and threshold.
    #[must_use]
    pub const fn new(shingle_size: usize, threshold: f64) -> Self {
        Self {
            shingle_size,
            threshold,
        }
    }

    /// Shingles one paragraph.
    #[must_use]
    pub fn shingles(&self, text: &str) -> ShingleSet {
        ShingleSet::from_text(text, self.shingle_size)
    }

    /// Jaccard similarity of two paragraphs.
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        jaccard(&self.shingles(a), &self.shingles(b))
    }

    /// Returns true if a similarity score falls in `[threshold, 1.0)`.
    #[must_use]
    pub fn is_similar_score(&self, similarity: f64) -> bool {
        similarity >= self.threshold && similarity < 1.0
    }

    /// Returns true if two paragraphs are similar but not identical.
    #[must_use]
    pub fn is_similar(&self, a: &str, b: &str) -> bool {
        self.is_similar_score(self.similarity(a, b))
    }

    fn pair(&self, left: usize, right: usize, a: &ShingleSet, b: &ShingleSet) -> Option<SimilarPair> {
        let similarity = jaccard(a, b);
        (similarity >= self.threshold).then_some(SimilarPair {
            left,
            right,
            similarity,
        })
    }
}

impl Default for NearDuplicateDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SHINGLE_SIZE, DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl PairScanner for NearDuplicateDetector {
    fn within(&self, sets: &[ShingleSet]) -> Vec<SimilarPair> {
        let mut pairs = Vec::new();
        for (i, a) in sets.iter().enumerate() {
            if a.is_empty() {
                continue;
            }
            for (j, b) in sets.iter().enumerate().skip(i + 1) {
                pairs.extend(self.pair(i, j, a, b));
            }
        }
        pairs
    }

    fn across(&self, left: &[ShingleSet], right: &[ShingleSet]) -> Vec<SimilarPair> {
        let mut pairs = Vec::new();
        for (i, a) in left.iter().enumerate() {
            if a.is_empty() {
                continue;
            }
            for (j, b) in right.iter().enumerate() {
                pairs.extend(self.pair(i, j, a, b));
            }
        }
        pairs
    }
}
