//! `SQLite` corpus store.
//!
//! - [`connection`]: mutex handling, poison recovery and pragma configuration
//! - [`metrics`]: per-operation counters and latency histograms
//! - [`store`]: the [`SqliteCorpusStore`] itself

mod connection;
mod metrics;
mod store;

pub use connection::{acquire_lock, configure_connection};
pub use metrics::record_operation_metrics;
pub use store::SqliteCorpusStore;
