//! Content hashing utility for deduplication.
//!
//! This module provides SHA256-based content hashing for exact match detection.
//! Content is normalized before hashing so that paragraphs differing only in
//! case or spacing hash identically, which keeps exact matching consistent
//! with shingle generation.

use crate::models::ContentHash;
use sha2::{Digest, Sha256};

/// Content hasher for deduplication.
///
/// # Normalization
///
/// Before hashing, content is normalized:
/// - Trimmed of leading/trailing whitespace
/// - Converted to lowercase
/// - Multiple whitespace characters collapsed to single spaces
///
/// # Example
///
/// ```rust
/// use paradup::services::deduplication::ContentHasher;
///
/// let hash = ContentHasher::hash("Use PostgreSQL for primary storage");
/// assert_eq!(hash.to_hex().len(), 64);
///
/// // Normalized content produces the same hash
/// let hash2 = ContentHasher::hash("  Use  postgresql  for  primary  storage  ");
/// assert_eq!(hash, hash2);
/// ```
pub struct ContentHasher;

impl ContentHasher {
    /// Computes the SHA256 hash of normalized content.
    #[must_use]
    pub fn hash(content: &str) -> ContentHash {
        Self::digest(&Self::normalize(content))
    }

    /// Hashes a window of already-normalized words, joined by single spaces.
    #[must_use]
    pub fn hash_words(words: &[&str]) -> ContentHash {
        Self::digest(&words.join(" "))
    }

    /// Normalizes content for consistent hashing.
    ///
    /// ```rust
    /// use paradup::services::deduplication::ContentHasher;
    ///
    /// assert_eq!(ContentHasher::normalize("  Hello   WORLD  "), "hello world");
    /// ```
    #[must_use]
    pub fn normalize(content: &str) -> String {
        content
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn digest(normalized: &str) -> ContentHash {
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        ContentHash::from_bytes(hasher.finalize().into())
    }
}
