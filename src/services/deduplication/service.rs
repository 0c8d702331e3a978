//! Duplicate detection service orchestrator.
//!
//! Ties the stateless [`DuplicateDetector`] to a [`CorpusStore`]:
//! 1. **Check**: report duplicates without storing anything
//! 2. **Submit**: report duplicates, then store the text with its report
//! 3. **Rescan**: recompute a stored text's report against its neighbours
//! 4. **Batch**: compare fetched pages with the whole corpus
//!
//! Any corpus read failure aborts the request; partial reports are never
//! returned.

use super::detector::DuplicateDetector;
use crate::models::{
    BatchItem, CorpusEntry, DuplicateReport, EntryId, FetchResult, MatchKind, Page, Scope,
    TextEntry,
};
use crate::storage::CorpusStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Result of storing a submitted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Identifier of the new entry.
    pub id: EntryId,
    /// Duplicates found at submission time.
    pub report: DuplicateReport,
}

/// Service for duplicate detection against a stored corpus.
///
/// # Example
///
/// ```rust
/// use paradup::{DuplicateDetectionService, DuplicateDetector, MemoryCorpusStore, Scope};
/// use std::sync::Arc;
///
/// let service = DuplicateDetectionService::new(
///     Arc::new(MemoryCorpusStore::new()),
///     DuplicateDetector::default(),
/// );
/// let first = service.submit("Hello there.", "alice")?;
/// assert!(first.report.is_empty());
///
/// let second = service.submit("Hello there.", "alice")?;
/// assert_eq!(second.report.external[0].source_id, first.id);
/// # Ok::<(), paradup::Error>(())
/// ```
pub struct DuplicateDetectionService<S: CorpusStore + ?Sized = dyn CorpusStore> {
    /// Corpus of previously stored texts.
    store: Arc<S>,
    /// Detection engine.
    detector: DuplicateDetector,
}

impl<S: CorpusStore + ?Sized> DuplicateDetectionService<S> {
    /// Creates a service over a store.
    #[must_use]
    pub const fn new(store: Arc<S>, detector: DuplicateDetector) -> Self {
        Self { store, detector }
    }

    /// Returns the detector.
    #[must_use]
    pub const fn detector(&self) -> &DuplicateDetector {
        &self.detector
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reports duplicates of `text` within itself and within `scope`.
    ///
    /// Nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus cannot be read.
    #[instrument(skip_all, fields(operation = "check", text_length = text.len(), scope = %scope))]
    pub fn check(&self, text: &str, scope: &Scope) -> Result<DuplicateReport> {
        let entries = self.load(scope)?;
        Ok(self.detect(text, &entries))
    }

    /// Reports duplicates of `content` against the owner's corpus, then stores it.
    ///
    /// The text is compared before it is saved, so it never matches itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for blank content, or an error if the
    /// corpus cannot be read or written.
    #[instrument(skip_all, fields(operation = "submit", text_length = content.len(), owner = %owner))]
    pub fn submit(&self, content: &str, owner: &str) -> Result<Submission> {
        if content.trim().is_empty() {
            return Err(Error::InvalidInput("content must not be empty".to_string()));
        }

        let entries = self.load(&Scope::owner(owner))?;
        let report = self.detect(content, &entries);

        let entry = TextEntry::new(owner, content).with_duplicates(report.clone());
        self.store.save(&entry)?;

        tracing::info!(
            id = %entry.id,
            internal = report.internal.len(),
            external = report.external.len(),
            "Stored submitted text"
        );
        Ok(Submission {
            id: entry.id,
            report,
        })
    }

    /// Recomputes a stored entry's report against the owner's other entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the entry is not visible to `owner`, or
    /// an error if the corpus cannot be read or written.
    #[instrument(skip_all, fields(operation = "rescan", id = %id, owner = %owner))]
    pub fn rescan(&self, id: &EntryId, owner: &str) -> Result<DuplicateReport> {
        let scope = Scope::owner(owner);
        let entry = self.get_in(id, &scope)?;

        let others: Vec<CorpusEntry> = self
            .load(&scope)?
            .into_iter()
            .filter(|e| e.id != entry.id)
            .collect();
        let report = self.detect(&entry.content, &others);

        self.store.update_duplicate_metadata(id, &report)?;
        tracing::debug!(matches = report.len(), "Rescanned stored text");
        Ok(report)
    }

    /// Fetches a stored entry visible to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such entry for the owner.
    pub fn get(&self, id: &EntryId, owner: &str) -> Result<TextEntry> {
        self.get_in(id, &Scope::owner(owner))
    }

    /// Lists the owner's entries, newest first.
    ///
    /// `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `page` or `limit` is zero, or an
    /// error if the corpus cannot be read.
    #[instrument(skip_all, fields(operation = "list", owner = %owner))]
    pub fn list(&self, owner: &str, page: usize, limit: usize) -> Result<Page<TextEntry>> {
        if page == 0 || limit == 0 {
            return Err(Error::InvalidInput(format!(
                "page and limit must be at least 1 (page={page}, limit={limit})"
            )));
        }
        let scope = Scope::owner(owner);
        let total = self.store.count(&scope)?;
        let offset = (page - 1).saturating_mul(limit);
        let entries = self.store.list(&scope, offset, limit)?;
        Ok(Page::new(entries, page, limit, total))
    }

    /// Compares a batch of fetched pages with the whole corpus.
    ///
    /// The corpus is only read when at least one page has content. Output
    /// order follows input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus cannot be read. Per-URL failures are
    /// reported in the returned items instead.
    #[instrument(skip_all, fields(operation = "compare_fetched_batch", urls = results.len()))]
    pub fn compare_fetched_batch(&self, results: Vec<FetchResult>) -> Result<Vec<BatchItem>> {
        let needs_corpus = results
            .iter()
            .any(|r| r.content_str().is_some_and(|c| !c.trim().is_empty()));
        let entries = if needs_corpus {
            self.load(&Scope::All)?
        } else {
            Vec::new()
        };

        let items = self.detector.compare_fetched_batch(results, &entries);
        for report in items.iter().filter_map(BatchItem::report) {
            record_report(report);
        }
        Ok(items)
    }

    fn get_in(&self, id: &EntryId, scope: &Scope) -> Result<TextEntry> {
        self.store
            .get(id, scope)?
            .ok_or_else(|| Error::NotFound(format!("text entry {id}")))
    }

    fn load(&self, scope: &Scope) -> Result<Vec<CorpusEntry>> {
        self.store.find_entries(scope).inspect_err(|e| {
            tracing::error!(error = %e, scope = %scope, "Corpus read failed, aborting request");
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, text: &str, entries: &[CorpusEntry]) -> DuplicateReport {
        let start = Instant::now();
        let report = self.detector.detect(text, entries);
        metrics::histogram!("paradup_detection_duration_ms")
            .record(start.elapsed().as_millis() as f64);
        record_report(&report);
        report
    }
}

fn record_report(report: &DuplicateReport) {
    for kind in [MatchKind::Exact, MatchKind::Similar] {
        let internal = report.internal.iter().filter(|m| m.kind == kind).count();
        let external = report.external.iter().filter(|m| m.kind == kind).count();
        if internal > 0 {
            metrics::counter!(
                "paradup_duplicates_total",
                "scope" => "internal",
                "kind" => kind.as_str()
            )
            .increment(internal as u64);
        }
        if external > 0 {
            metrics::counter!(
                "paradup_duplicates_total",
                "scope" => "external",
                "kind" => kind.as_str()
            )
            .increment(external as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_CONTENT_MARKER;
    use crate::storage::MemoryCorpusStore;
    use crate::storage::memory::FailingCorpusStore;

    fn service() -> DuplicateDetectionService<MemoryCorpusStore> {
        DuplicateDetectionService::new(Arc::new(MemoryCorpusStore::new()), DuplicateDetector::default())
    }

    #[test]
    fn test_submit_rejects_blank_content() {
        let service = service();
        assert!(matches!(service.submit("", "alice"), Err(Error::InvalidInput(_))));
        assert!(matches!(service.submit(" \n\t", "alice"), Err(Error::InvalidInput(_))));
        assert_eq!(service.store().count(&Scope::All).unwrap(), 0);
    }

    #[test]
    fn test_submit_stores_report() {
        let service = service();
        let submission = service.submit("A.\nA.", "alice").unwrap();
        assert_eq!(submission.report.internal.len(), 1);

        let stored = service.get(&submission.id, "alice").unwrap();
        assert_eq!(stored.content, "A.\nA.");
        assert_eq!(stored.duplicates, submission.report);
    }

    #[test]
    fn test_submit_compares_only_owner_corpus() {
        let service = service();
        service.submit("Shared paragraph.", "alice").unwrap();

        let bob = service.submit("Shared paragraph.", "bob").unwrap();
        assert!(bob.report.external.is_empty());

        let alice = service.submit("Shared paragraph.", "alice").unwrap();
        assert_eq!(alice.report.external.len(), 1);
    }

    #[test]
    fn test_get_is_owner_scoped() {
        let service = service();
        let submission = service.submit("Private text.", "alice").unwrap();
        assert!(matches!(service.get(&submission.id, "bob"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_check_does_not_store() {
        let service = service();
        service.check("Anything.", &Scope::owner("alice")).unwrap();
        assert_eq!(service.store().count(&Scope::All).unwrap(), 0);
    }

    #[test]
    fn test_rescan_picks_up_later_entries() {
        let service = service();
        let first = service.submit("Original line.", "alice").unwrap();
        assert!(first.report.is_empty());
        service.submit("Original line.\nAnother.", "alice").unwrap();

        let report = service.rescan(&first.id, "alice").unwrap();
        assert_eq!(report.external.len(), 1);
        assert_eq!(service.get(&first.id, "alice").unwrap().duplicates, report);
    }

    #[test]
    fn test_list_pagination() {
        let service = service();
        for i in 0..3 {
            service.submit(&format!("Text number {i}."), "alice").unwrap();
        }
        let page = service.list("alice", 1, 2).unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.total_entries, 3);
        assert_eq!(page.total_pages, 2);

        let last = service.list("alice", 2, 2).unwrap();
        assert_eq!(last.entries.len(), 1);

        assert!(matches!(service.list("alice", 0, 10), Err(Error::InvalidInput(_))));
        assert!(matches!(service.list("alice", 1, 0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_store_failure_is_fatal() {
        let service =
            DuplicateDetectionService::new(Arc::new(FailingCorpusStore), DuplicateDetector::default());
        assert!(matches!(
            service.check("A.", &Scope::All),
            Err(Error::OperationFailed { .. })
        ));
        assert!(service.submit("A.", "alice").is_err());
        assert!(
            service
                .compare_fetched_batch(vec![FetchResult::content("a", "hello")])
                .is_err()
        );
    }

    #[test]
    fn test_batch_without_content_skips_corpus() {
        let service =
            DuplicateDetectionService::new(Arc::new(FailingCorpusStore), DuplicateDetector::default());
        let items = service
            .compare_fetched_batch(vec![
                FetchResult::error("a", "timeout"),
                FetchResult::content("b", ""),
            ])
            .unwrap();
        assert_eq!(items[0].error(), Some("timeout"));
        assert_eq!(items[1].error(), Some(NO_CONTENT_MARKER));
    }

    #[test]
    fn test_batch_compares_against_all_owners() {
        let service = service();
        let stored = service.submit("Seen on the web.", "alice").unwrap();

        let items = service
            .compare_fetched_batch(vec![FetchResult::content("https://x", "Seen on the web.")])
            .unwrap();
        let report = items[0].report().unwrap();
        assert_eq!(report.external[0].source_id, stored.id);
    }
}
