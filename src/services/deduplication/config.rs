//! Detection configuration.
//!
//! This module defines the tunables of the duplicate detector: shingle width,
//! similarity threshold, sentence re-split length and worker count.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of words per shingle.
pub const DEFAULT_SHINGLE_SIZE: usize = 5;

/// Default minimum Jaccard similarity for a `Similar` classification.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Default length (in characters) above which a line is re-split into sentences.
pub const DEFAULT_LONG_PARAGRAPH_CHARS: usize = 100;

/// Configuration for the duplicate detector.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `PARADUP_SHINGLE_SIZE` | usize | `5` | Words per shingle |
/// | `PARADUP_SIMILARITY_THRESHOLD` | f64 | `0.8` | Minimum similarity for `Similar` |
/// | `PARADUP_LONG_PARAGRAPH_CHARS` | usize | `100` | Sentence re-split length |
/// | `PARADUP_MAX_WORKERS` | usize | `0` | Corpus workers (0 = available cores) |
///
/// # Example
///
/// ```rust
/// use paradup::DetectionSettings;
///
/// let settings = DetectionSettings::default();
/// assert_eq!(settings.shingle_size, 5);
/// assert!((settings.similarity_threshold - 0.8).abs() < f64::EPSILON);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Words per shingle (k).
    pub shingle_size: usize,

    /// Minimum Jaccard similarity for a pair to be reported as `Similar`.
    ///
    /// A similarity of exactly 1.0 is never `Similar`; it is reported as
    /// `Exact`.
    pub similarity_threshold: f64,

    /// Lines longer than this many characters are split into sentences.
    pub long_paragraph_chars: usize,

    /// Worker threads for per-entry corpus comparison (0 = available cores).
    pub max_workers: usize,
}

impl DetectionSettings {
    /// Creates settings from environment variables over the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse("PARADUP_SHINGLE_SIZE") {
            self.shingle_size = v;
        }
        if let Some(v) = env_parse("PARADUP_SIMILARITY_THRESHOLD") {
            self.similarity_threshold = v;
        }
        if let Some(v) = env_parse("PARADUP_LONG_PARAGRAPH_CHARS") {
            self.long_paragraph_chars = v;
        }
        if let Some(v) = env_parse("PARADUP_MAX_WORKERS") {
            self.max_workers = v;
        }
        self
    }

    /// Checks that the settings describe a usable detector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero shingle size, a threshold
    /// outside `(0, 1]`, or a zero re-split length.
    pub fn validate(&self) -> Result<()> {
        if self.shingle_size == 0 {
            return Err(Error::InvalidInput(
                "shingle_size must be at least 1".to_string(),
            ));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.long_paragraph_chars == 0 {
            return Err(Error::InvalidInput(
                "long_paragraph_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder method to set the shingle size.
    #[must_use]
    pub const fn with_shingle_size(mut self, k: usize) -> Self {
        self.shingle_size = k;
        self
    }

    /// Builder method to set the similarity threshold.
    #[must_use]
    pub const fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Builder method to set the sentence re-split length.
    #[must_use]
    pub const fn with_long_paragraph_chars(mut self, chars: usize) -> Self {
        self.long_paragraph_chars = chars;
        self
    }

    /// Builder method to set the worker count.
    #[must_use]
    pub const fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            shingle_size: DEFAULT_SHINGLE_SIZE,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            long_paragraph_chars: DEFAULT_LONG_PARAGRAPH_CHARS,
            max_workers: 0,
        }
    }
}

/// Reads and parses an environment variable, ignoring unset or bad values.
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_settings() {
        let settings = DetectionSettings::default();
        assert_eq!(settings.shingle_size, 5);
        assert!((settings.similarity_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(settings.long_paragraph_chars, 100);
        assert_eq!(settings.max_workers, 0);
    }

    #[test]
    fn test_builder_methods() {
        let settings = DetectionSettings::default()
            .with_shingle_size(3)
            .with_similarity_threshold(0.5)
            .with_long_paragraph_chars(80)
            .with_max_workers(2);

        assert_eq!(settings.shingle_size, 3);
        assert!((settings.similarity_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.long_paragraph_chars, 80);
        assert_eq!(settings.max_workers, 2);
    }

    #[test_case(0, 0.8, 100 ; "zero shingle size")]
    #[test_case(5, 0.0, 100 ; "zero threshold")]
    #[test_case(5, 1.5, 100 ; "threshold above one")]
    #[test_case(5, f64::NAN, 100 ; "nan threshold")]
    #[test_case(5, 0.8, 0 ; "zero resplit length")]
    fn test_validate_rejects(k: usize, threshold: f64, chars: usize) {
        let settings = DetectionSettings {
            shingle_size: k,
            similarity_threshold: threshold,
            long_paragraph_chars: chars,
            max_workers: 0,
        };
        assert!(matches!(settings.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_threshold_of_one_is_valid() {
        let settings = DetectionSettings::default().with_similarity_threshold(1.0);
        assert!(settings.validate().is_ok());
    }
}
