//! Crawl orchestration with a bounded fetch bulkhead.

use super::ContentFetcher;
use super::config::CrawlSettings;
use crate::models::{BatchItem, FetchOutcome, FetchResult};
use crate::services::deduplication::DuplicateDetectionService;
use crate::storage::CorpusStore;
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::instrument;

/// Fetches batches of URLs with at most `max_concurrent_fetches` in flight.
///
/// Each fetch runs on tokio's blocking pool while holding a semaphore permit.
/// Results come back in request order.
pub struct CrawlService<F: ContentFetcher + ?Sized = dyn ContentFetcher> {
    fetcher: Arc<F>,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl<F: ContentFetcher + ?Sized + 'static> CrawlService<F> {
    /// Creates a crawl service. A limit of zero is raised to one.
    #[must_use]
    pub fn new(fetcher: Arc<F>, settings: &CrawlSettings) -> Self {
        let max_concurrent = settings.max_concurrent_fetches.max(1);
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Returns the fetch concurrency limit.
    #[must_use]
    pub const fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Fetches every URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `urls` is empty. Individual fetch
    /// failures are reported per URL.
    #[instrument(skip_all, fields(operation = "crawl", urls = urls.len(), max_concurrent = self.max_concurrent))]
    pub async fn crawl(&self, urls: &[String]) -> Result<Vec<FetchResult>> {
        if urls.is_empty() {
            return Err(Error::InvalidInput(
                "Please provide an array of URLs to crawl".to_string(),
            ));
        }

        let handles: Vec<_> = urls
            .iter()
            .cloned()
            .map(|url| {
                let semaphore = Arc::clone(&self.semaphore);
                let fetcher = Arc::clone(&self.fetcher);
                tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return FetchResult::error(url, "crawler shut down");
                    };
                    let task_url = url.clone();
                    tokio::task::spawn_blocking(move || fetcher.fetch(&task_url))
                        .await
                        .unwrap_or_else(|e| FetchResult::error(url, format!("fetch task failed: {e}")))
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (handle, url) in handles.into_iter().zip(urls) {
            let result = handle
                .await
                .unwrap_or_else(|e| FetchResult::error(url.clone(), format!("fetch task failed: {e}")));
            record_fetch(&result);
            results.push(result);
        }
        Ok(results)
    }

    /// Fetches every URL and compares the pages with the whole corpus.
    ///
    /// The corpus read and detection run on the blocking pool, off the
    /// runtime's worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `urls` is empty, or an error if the
    /// corpus cannot be read.
    pub async fn crawl_and_compare<S: CorpusStore + ?Sized + 'static>(
        &self,
        urls: &[String],
        detection: Arc<DuplicateDetectionService<S>>,
    ) -> Result<Vec<BatchItem>> {
        let fetched = self.crawl(urls).await?;
        tokio::task::spawn_blocking(move || detection.compare_fetched_batch(fetched))
            .await
            .map_err(|e| Error::operation("compare_fetched_batch", e))?
    }
}

fn record_fetch(result: &FetchResult) {
    let outcome = match &result.outcome {
        FetchOutcome::Content(_) => "content",
        FetchOutcome::Error(e) => {
            tracing::warn!(url = %result.url, error = %e, "Fetch failed, continuing with batch");
            "error"
        },
    };
    metrics::counter!("paradup_fetch_total", "result" => outcome).increment(1);
}
