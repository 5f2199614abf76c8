//! Prometheus-compatible metrics for the campus concierge.
//!
//! Counts routed queries per intent, collaborator fallbacks and dataset
//! load failures, plus end-to-end query latency.

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Global metrics instance.
static METRICS: std::sync::OnceLock<Arc<Metrics>> = std::sync::OnceLock::new();

/// Get or initialize the global metrics instance.
pub fn get_metrics() -> Arc<Metrics> {
    METRICS.get_or_init(|| Arc::new(Metrics::new())).clone()
}

/// Latency buckets in seconds, 1ms to 10s (collaborator timeouts land in the top bucket).
fn default_latency_buckets() -> Vec<f64> {
    vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]
}

/// All metrics for the server.
pub struct Metrics {
    /// Prometheus registry for all metrics.
    pub registry: Registry,

    /// Queries answered, labelled by routed intent.
    pub queries_total: IntCounterVec,
    /// Collaborator calls that failed or timed out, labelled by collaborator.
    pub collaborator_failures_total: IntCounterVec,
    /// Queries answered by cross-dataset fallback search.
    pub fallback_searches_total: IntCounter,
    /// Dataset files skipped at load time.
    pub dataset_load_errors_total: IntCounter,
    /// Server uptime in seconds.
    pub uptime_seconds: IntGauge,
    /// End-to-end query latency.
    pub query_duration_seconds: Histogram,

    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance with all metrics registered.
    pub fn new() -> Self {
        let registry = Registry::new();

        let queries_total = IntCounterVec::new(
            Opts::new("campus_queries_total", "Total number of queries by routed intent"),
            &["intent"],
        )
        .expect("failed to create counter");

        let collaborator_failures_total = IntCounterVec::new(
            Opts::new(
                "campus_collaborator_failures_total",
                "External collaborator calls that fell back to local logic",
            ),
            &["collaborator"],
        )
        .expect("failed to create counter");

        let fallback_searches_total = IntCounter::new(
            "campus_fallback_searches_total",
            "Total number of queries answered by fallback search",
        )
        .expect("failed to create counter");

        let dataset_load_errors_total = IntCounter::new(
            "campus_dataset_load_errors_total",
            "Total number of dataset files skipped at load",
        )
        .expect("failed to create counter");

        let uptime_seconds = IntGauge::new("campus_uptime_seconds", "Server uptime in seconds")
            .expect("failed to create gauge");

        let query_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "campus_query_duration_seconds",
                "Query classification and resolution duration in seconds",
            )
            .buckets(default_latency_buckets()),
        )
        .expect("failed to create histogram");

        registry
            .register(Box::new(queries_total.clone()))
            .expect("failed to register counter");
        registry
            .register(Box::new(collaborator_failures_total.clone()))
            .expect("failed to register counter");
        registry
            .register(Box::new(fallback_searches_total.clone()))
            .expect("failed to register counter");
        registry
            .register(Box::new(dataset_load_errors_total.clone()))
            .expect("failed to register counter");
        registry
            .register(Box::new(uptime_seconds.clone()))
            .expect("failed to register gauge");
        registry
            .register(Box::new(query_duration_seconds.clone()))
            .expect("failed to register histogram");

        Self {
            registry,
            queries_total,
            collaborator_failures_total,
            fallback_searches_total,
            dataset_load_errors_total,
            uptime_seconds,
            query_duration_seconds,
            start_time: Instant::now(),
        }
    }

    /// Record a routed query.
    pub fn record_query(&self, intent: &str, elapsed: Duration) {
        self.queries_total.with_label_values(&[intent]).inc();
        self.query_duration_seconds.observe(elapsed.as_secs_f64());
    }

    /// Record a collaborator fallback.
    pub fn record_collaborator_failure(&self, collaborator: &str) {
        self.collaborator_failures_total
            .with_label_values(&[collaborator])
            .inc();
    }

    /// Update the uptime gauge.
    pub fn update_uptime(&self) {
        self.uptime_seconds
            .set(self.start_time.elapsed().as_secs() as i64);
    }

    /// Export metrics in Prometheus text format.
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;
        self.update_uptime();

        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!("Failed to encode metrics: {}", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Snapshot of the scalar counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.update_uptime();
        MetricsSnapshot {
            fallback_searches_total: self.fallback_searches_total.get(),
            dataset_load_errors_total: self.dataset_load_errors_total.get(),
            uptime_seconds: self.uptime_seconds.get(),
            queries_observed: self.query_duration_seconds.get_sample_count(),
        }
    }
}

/// Scalar metrics reported by `/admin/debug-data`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub fallback_searches_total: u64,
    pub dataset_load_errors_total: u64,
    pub uptime_seconds: i64,
    pub queries_observed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_counters() {
        let metrics = Metrics::new();
        metrics.record_query("calendar", Duration::from_millis(5));
        metrics.record_query("calendar", Duration::from_millis(7));
        metrics.record_query("clubs", Duration::from_millis(1));
        metrics.record_collaborator_failure("llm");

        assert_eq!(metrics.queries_total.with_label_values(&["calendar"]).get(), 2);
        assert_eq!(metrics.queries_total.with_label_values(&["clubs"]).get(), 1);
        assert_eq!(
            metrics.collaborator_failures_total.with_label_values(&["llm"]).get(),
            1
        );
        assert_eq!(metrics.snapshot().queries_observed, 3);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.record_query("teacher", Duration::from_millis(2));
        metrics.fallback_searches_total.inc_by(4);

        let output = metrics.export_prometheus();
        assert!(output.contains(r#"campus_queries_total{intent="teacher"} 1"#));
        assert!(output.contains("campus_fallback_searches_total 4"));
        assert!(output.contains("campus_query_duration_seconds"));
        assert!(!output.contains("_ms"));
    }

    #[test]
    fn test_global_metrics() {
        let metrics = get_metrics();
        metrics.dataset_load_errors_total.inc();
        assert!(metrics.dataset_load_errors_total.get() >= 1);
    }
}
