//! CLI command implementations.
//!
//! Each command returns its output as pretty-printed JSON; the binary only
//! prints it.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Report duplicates of a file without storing it |
//! | `submit` | Report duplicates of a file, then store it |
//! | `show` | Print a stored text and its report |
//! | `list` | List stored texts, newest first |
//! | `rescan` | Recompute a stored text's report |
//! | `crawl` | Fetch pages and compare them with the whole corpus |
//!
//! # Example Usage
//!
//! ```bash
//! paradup submit --owner alice essay.txt
//! paradup check --owner alice draft.txt
//! paradup list --owner alice --page 2
//! paradup crawl https://example.com/a https://example.com/b
//! ```

mod crawl;
mod text;

pub use crawl::cmd_crawl;
pub use text::{cmd_check, cmd_list, cmd_rescan, cmd_show, cmd_submit};

use crate::config::ParadupConfig;
use crate::services::deduplication::{DuplicateDetectionService, DuplicateDetector, Segmenter};
use crate::storage::SqliteCorpusStore;
use crate::{Error, Result};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Reads a text file, or stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not UTF-8.
pub fn read_input(path: &Path) -> Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| Error::operation("read_stdin", e))?;
        buf
    } else {
        std::fs::read(path)
            .map_err(|e| Error::operation("read_input", format!("{}: {e}", path.display())))?
    };
    Segmenter::decode(&bytes).map(str::to_owned)
}

/// Opens the configured `SQLite` corpus and wraps it in a detection service.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the database cannot be
/// opened.
pub fn open_service(
    config: &ParadupConfig,
) -> Result<DuplicateDetectionService<SqliteCorpusStore>> {
    let detector = DuplicateDetector::new(config.detection.clone())?;
    let path = config.storage.database_path();
    tracing::debug!(path = %path.display(), "Opening corpus database");
    let store = SqliteCorpusStore::new(&path)?;
    Ok(DuplicateDetectionService::new(Arc::new(store), detector))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::operation("serialize_output", e))
}
