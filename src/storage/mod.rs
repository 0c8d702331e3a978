//! Corpus storage.
//!
//! Stored texts are reached through the [`CorpusStore`] trait:
//! - **Memory**: `RwLock`-guarded vector, for tests and one-shot runs
//! - **`SQLite`**: persistent store shared by CLI invocations

// Allow significant_drop_tightening - dropping database connections slightly early
// provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryCorpusStore;
pub use sqlite::SqliteCorpusStore;
pub use traits::CorpusStore;

use std::path::PathBuf;

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "paradup.db";

/// Returns the platform data directory for paradup.
///
/// Falls back to `.paradup` in the working directory when no home directory
/// can be determined.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "paradup")
        .map_or_else(|| PathBuf::from(".paradup"), |d| d.data_dir().to_path_buf())
}
