//! Shared metrics recording for text stores.
//!
//! No exporter is installed here; without a recorder the `metrics` macros
//! are no-ops.

use crate::Result;
use std::time::Instant;

/// Records operation metrics for a store operation.
///
/// This function records two metrics for each operation:
/// 1. `tir_store_operations_total` - Counter for operation count by status
/// 2. `tir_store_operation_duration_ms` - Histogram for operation latency
///
/// # Arguments
///
/// * `backend` - Backend name (e.g., "file", "sqlite", "http")
/// * `operation` - Operation name (e.g., "read", "upsert", "delete", "list")
/// * `start` - Operation start time from `Instant::now()`
/// * `status` - Operation status ("success", "not_found" or "error")
///
/// # Examples
///
/// ```ignore
/// use std::time::Instant;
/// use tiir::storage::metrics::{record_operation_metrics, status_of};
///
/// let start = Instant::now();
/// let result = store.read(&id);
/// record_operation_metrics("file", "read", start, status_of(&result));
/// ```
pub fn record_operation_metrics(
    backend: &'static str,
    operation: &'static str,
    start: Instant,
    status: &'static str,
) {
    metrics::counter!(
        "tir_store_operations_total",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "tir_store_operation_duration_ms",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}

/// Status label for an operation result.
///
/// Not-found is reported separately from other errors since it is an
/// expected outcome of reads and deletes.
pub fn status_of<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) if e.is_not_found() => "not_found",
        Err(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::models::TextId;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_record_operation_metrics_without_recorder() {
        let start = Instant::now();
        thread::sleep(Duration::from_millis(1));

        record_operation_metrics("file", "upsert", start, "success");
        record_operation_metrics("sqlite", "read", start, "not_found");
        record_operation_metrics("http", "list", start, "error");

        assert!(start.elapsed().as_millis() >= 1);
    }

    #[test]
    fn test_status_of() {
        assert_eq!(status_of(&Ok::<_, Error>(())), "success");
        assert_eq!(
            status_of::<()>(&Err(Error::NotFound(TextId::new("abc123de")))),
            "not_found"
        );
        assert_eq!(
            status_of::<()>(&Err(Error::Conflict("duplicate".to_string()))),
            "error"
        );
    }
}
