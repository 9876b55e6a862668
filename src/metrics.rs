use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};

/// Metric names for store and catalog operations.
///
/// Nothing is exported unless the host process installs a recorder.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    /// Counter of store operations by kind, operation and status
    pub store_operations_total: &'static str,
    /// Histogram of store operation latency
    pub store_operation_duration: &'static str,
    /// Gauge of the configured pool size
    pub db_connection_pool_size: &'static str,
    /// Counter of rows returned by searches
    pub search_results_total: &'static str,
    /// Counter of failed operations
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            store_operations_total: "media_gallery_store_operations_total",
            store_operation_duration: "media_gallery_store_operation_duration_seconds",
            db_connection_pool_size: "media_gallery_db_connection_pool_size",
            search_results_total: "media_gallery_search_results_total",
            errors_total: "media_gallery_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record one unit of work against the store
    pub fn record_store_operation(
        &self,
        kind: &'static str,
        operation: &'static str,
        duration: Duration,
        success: bool,
    ) {
        let status = if success { "success" } else { "error" };

        counter!(self.store_operations_total, "kind" => kind, "operation" => operation, "status" => status)
            .increment(1);
        histogram!(self.store_operation_duration, "kind" => kind, "operation" => operation)
            .record(duration.as_secs_f64());

        if !success {
            self.record_error("store", operation);
        }
    }

    /// Record how many rows a search returned for one kind
    pub fn record_search_results(&self, kind: &'static str, count: usize) {
        counter!(self.search_results_total, "kind" => kind).increment(count as u64);
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &'static str, operation: &'static str) {
        counter!(self.errors_total, "type" => error_type, "operation" => operation).increment(1);
    }

    /// Update connection pool size
    pub fn update_connection_pool_size(&self, size: u32) {
        gauge!(self.db_connection_pool_size).set(f64::from(size));
    }
}

/// Times one store operation and reports it to a [`MetricsCollector`]
#[derive(Debug)]
pub struct MetricsTimer {
    collector: MetricsCollector,
    kind: &'static str,
    operation: &'static str,
    start: Instant,
}

impl MetricsTimer {
    /// Start timing `operation` on `kind`
    #[must_use]
    pub fn new(collector: MetricsCollector, kind: &'static str, operation: &'static str) -> Self {
        Self {
            collector,
            kind,
            operation,
            start: Instant::now(),
        }
    }

    /// Stop the timer and record the outcome; returns the elapsed time
    pub fn finish(self, success: bool) -> Duration {
        let duration = self.start.elapsed();
        self.collector
            .record_store_operation(self.kind, self.operation, duration, success);
        duration
    }
}
