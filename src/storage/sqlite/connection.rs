//! Shared connection handling for the `SQLite` store.
//!
//! This module provides utilities for managing `SQLite` connections with proper
//! mutex handling, poison recovery, and performance configuration.

use crate::{Error, Result};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Busy timeout applied to every connection.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper to acquire mutex lock with poison recovery.
///
/// If the mutex is poisoned (due to a panic in a previous critical section),
/// the inner value is recovered and a warning is logged. One panicking
/// request must not take the corpus down for every later request.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!("paradup_sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Configures a `SQLite` connection for concurrent access.
///
/// # Configuration Applied
///
/// | Pragma | Value | Effect |
/// |--------|-------|--------|
/// | `journal_mode` | `WAL` | Readers do not block the writer |
/// | `synchronous` | `NORMAL` | Balances durability with performance |
/// | `busy_timeout` | `5000` | Waits for locks instead of failing with `SQLITE_BUSY` |
///
/// In-memory databases ignore the WAL request and keep the `memory` journal.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the busy timeout cannot be applied.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    // journal_mode returns the new mode as a row, so the result is ignored
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| Error::operation("configure_connection", e))
}
