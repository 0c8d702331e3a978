//! The detection engine facade.
//!
//! [`DuplicateDetector`] is stateless apart from its immutable settings and
//! worker pool: every call owns its own hash index and match lists, so one
//! detector can be shared freely between requests and threads.

use super::config::DetectionSettings;
use super::corpus::CrossCorpusComparator;
use super::exact_match::ExactMatchDetector;
use super::hasher::ContentHasher;
use super::near_duplicate::{NearDuplicateDetector, PairScanner};
use super::report::build_report;
use super::segmenter::Segmenter;
use super::types::WithinTextResult;
use crate::models::{
    BatchItem, BatchOutcome, CorpusEntry, DuplicateReport, ExternalMatch, FetchOutcome,
    FetchResult, InternalMatch, MatchKind, NO_CONTENT_MARKER, ParagraphUnit,
};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Finds exact and near-duplicate paragraphs within and across texts.
///
/// # Example
///
/// ```rust
/// use paradup::{CorpusEntry, DuplicateDetector, MatchKind};
///
/// let detector = DuplicateDetector::default();
/// let corpus = vec![CorpusEntry::new("e1", "Stored paragraph.\nSomething else.")];
/// let report = detector.detect("Fresh paragraph.\nStored paragraph.", &corpus);
///
/// assert!(report.internal.is_empty());
/// assert_eq!(report.external.len(), 1);
/// assert_eq!(report.external[0].new_text_index, 1);
/// assert_eq!(report.external[0].kind, MatchKind::Exact);
/// ```
#[derive(Clone)]
pub struct DuplicateDetector {
    settings: DetectionSettings,
    segmenter: Segmenter,
    near: NearDuplicateDetector,
    scanner: Arc<dyn PairScanner>,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl DuplicateDetector {
    /// Creates a detector from validated settings.
    ///
    /// A dedicated worker pool is built when `max_workers` is non-zero;
    /// otherwise rayon's global pool (one thread per core) is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for invalid settings and
    /// [`Error::OperationFailed`] if the worker pool cannot be built.
    pub fn new(settings: DetectionSettings) -> Result<Self> {
        settings.validate()?;

        let pool = if settings.max_workers > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(settings.max_workers)
                .thread_name(|i| format!("paradup-worker-{i}"))
                .build()
                .map_err(|e| Error::operation("build_worker_pool", e))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self::assemble(settings, pool))
    }

    /// Builds the detector from settings that are already known to be valid.
    fn assemble(settings: DetectionSettings, pool: Option<Arc<rayon::ThreadPool>>) -> Self {
        let near =
            NearDuplicateDetector::new(settings.shingle_size, settings.similarity_threshold);
        Self {
            segmenter: Segmenter::new(settings.long_paragraph_chars),
            near,
            scanner: Arc::new(near),
            pool,
            settings,
        }
    }

    /// Replaces the pair scanner used for the similar passes.
    #[must_use]
    pub fn with_scanner(mut self, scanner: Arc<dyn PairScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Segments text with this detector's settings.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<ParagraphUnit> {
        self.segmenter.segment(text)
    }

    /// Finds duplicates within one text.
    ///
    /// Exact repeats are found first; the similar pass then covers every
    /// unordered pair `(i, j)`, `i < j`, skipping pairs already reported as
    /// exact. A pair with identical shingle sets but different hashes is
    /// reported as exact by the similar pass.
    #[instrument(skip_all, fields(operation = "detect_within_text", text_length = text.len()))]
    pub fn detect_within_text(&self, text: &str) -> WithinTextResult {
        let paragraphs = self.segmenter.segment(text);
        let (hashes, mut internal_matches) = ExactMatchDetector::scan(&paragraphs);
        let shingles: Vec<_> = paragraphs.iter().map(|u| self.near.shingles(&u.text)).collect();

        let exact_pairs: HashSet<(usize, usize)> = internal_matches
            .iter()
            .map(|m| (m.original_index, m.index))
            .collect();

        for pair in self.scanner.within(&shingles) {
            if exact_pairs.contains(&(pair.left, pair.right)) {
                continue;
            }
            let (Some(original), Some(unit)) =
                (paragraphs.get(pair.left), paragraphs.get(pair.right))
            else {
                continue;
            };
            let kind = pair.kind();
            // equal hashes belong to the exact scan, which points at the first occurrence
            if kind == MatchKind::Exact
                && ContentHasher::hash(&original.text) == ContentHasher::hash(&unit.text)
            {
                continue;
            }
            internal_matches.push(InternalMatch {
                index: pair.right,
                paragraph: unit.text.clone(),
                original_index: pair.left,
                kind,
            });
        }
        internal_matches.sort_by_key(|m| (m.index, m.original_index, m.kind));

        tracing::debug!(
            paragraphs = paragraphs.len(),
            internal = internal_matches.len(),
            "Within-text detection complete"
        );

        WithinTextResult {
            paragraphs,
            hashes,
            internal_matches,
            shingles,
        }
    }

    /// Finds duplicates of an analysed text among corpus entries.
    pub fn detect_against_corpus(
        &self,
        new_text: &WithinTextResult,
        entries: &[CorpusEntry],
    ) -> Vec<ExternalMatch> {
        CrossCorpusComparator::new(self.segmenter, self.settings.shingle_size, &*self.scanner)
            .compare_all(new_text, entries, self.pool.as_deref())
    }

    /// Runs both detections and assembles the report.
    pub fn detect(&self, text: &str, entries: &[CorpusEntry]) -> DuplicateReport {
        let within = self.detect_within_text(text);
        let external = self.detect_against_corpus(&within, entries);
        build_report(within.internal_matches, external)
    }

    /// Compares every fetched page of a batch with the corpus.
    ///
    /// Failed fetches keep their error and blank pages get
    /// [`NO_CONTENT_MARKER`]; detection only runs on pages with text. Output
    /// order follows input order.
    #[instrument(skip_all, fields(operation = "compare_fetched_batch", urls = results.len(), entries = entries.len()))]
    pub fn compare_fetched_batch(
        &self,
        results: Vec<FetchResult>,
        entries: &[CorpusEntry],
    ) -> Vec<BatchItem> {
        results
            .into_iter()
            .map(|FetchResult { url, outcome }| {
                let outcome = match outcome {
                    FetchOutcome::Error(error) => {
                        tracing::debug!(url = %url, error = %error, "Skipping failed fetch");
                        BatchOutcome::Error(error)
                    },
                    FetchOutcome::Content(content) if content.trim().is_empty() => {
                        BatchOutcome::Error(NO_CONTENT_MARKER.to_string())
                    },
                    FetchOutcome::Content(content) => {
                        BatchOutcome::Report(self.detect(&content, entries))
                    },
                };
                BatchItem { url, outcome }
            })
            .collect()
    }
}

impl Default for DuplicateDetector {
    /// Default settings on rayon's global pool.
    fn default() -> Self {
        Self::assemble(DetectionSettings::default(), None)
    }
}

impl fmt::Debug for DuplicateDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateDetector")
            .field("settings", &self.settings)
            .field("dedicated_pool", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}
