//! Metrics recording for the `SQLite` store.

use std::time::Instant;

/// Records the outcome and latency of a store operation.
///
/// Emits `paradup_store_operations_total` (counter) and
/// `paradup_store_operation_duration_ms` (histogram), both labelled with
/// `operation` and `status` (`success` or `error`).
pub fn record_operation_metrics(operation: &'static str, start: Instant, status: &'static str) {
    metrics::counter!(
        "paradup_store_operations_total",
        "backend" => "sqlite",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "paradup_store_operation_duration_ms",
        "backend" => "sqlite",
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}
