//! Crawl command.

use super::{open_service, to_json};
use crate::Result;
use crate::config::ParadupConfig;
use crate::crawler::{CrawlService, HttpContentFetcher};
use crate::Error;
use std::sync::Arc;

/// Fetches pages and compares them with every stored text.
///
/// Runs its own tokio runtime; the blocking HTTP client is created and
/// dropped outside of it.
///
/// # Errors
///
/// Returns an error for an empty URL list, if the HTTP client or runtime
/// cannot be built, or if the corpus cannot be read.
pub fn cmd_crawl(config: &ParadupConfig, urls: &[String]) -> Result<String> {
    let service = Arc::new(open_service(config)?);
    let fetcher = Arc::new(HttpContentFetcher::new(&config.crawl)?);
    let crawler = CrawlService::new(fetcher, &config.crawl);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("paradup-crawl")
        .build()
        .map_err(|e| Error::operation("build_runtime", e))?;
    let items = runtime.block_on(crawler.crawl_and_compare(urls, Arc::clone(&service)))?;
    drop(runtime);

    let failed = items.iter().filter(|i| i.error().is_some()).count();
    tracing::info!(urls = urls.len(), failed, "Crawl comparison complete");
    to_json(&items)
}
