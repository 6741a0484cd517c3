// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramTimer, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - API requests per operation and outcome
// - Request latency
// - Backup mirror writes
// - Records restored from the backup mirror
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct ServiceMetrics {
    registry: Registry,

    pub requests_total: IntCounterVec,
    pub request_duration: HistogramVec,

    pub backup_writes_total: IntCounterVec,
    pub restored_actions_total: IntCounter,
}

impl ServiceMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("action_requests_total", "Total action API requests"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new("action_request_duration_seconds", "Action API request duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        let backup_writes_total = IntCounterVec::new(
            Opts::new("backup_writes_total", "Backup mirror rewrites"),
            &["outcome"],
        )?;
        registry.register(Box::new(backup_writes_total.clone()))?;

        let restored_actions_total = IntCounter::new(
            "restored_actions_total",
            "Actions re-inserted from the backup mirror",
        )?;
        registry.register(Box::new(restored_actions_total.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            backup_writes_total,
            restored_actions_total,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Timer that observes into the request histogram when dropped
    pub fn start_request_timer(&self, operation: &str) -> HistogramTimer {
        self.request_duration.with_label_values(&[operation]).start_timer()
    }

    pub fn record_request(&self, operation: &str, outcome: &str) {
        self.requests_total.with_label_values(&[operation, outcome]).inc();
    }

    pub fn record_backup_write(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.backup_writes_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_restore(&self, count: usize) {
        self.restored_actions_total.inc_by(count as u64);
    }
}
