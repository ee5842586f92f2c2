//! Prometheus metrics for the policy manager.
//!
//! All metrics follow the naming convention: `pm_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: admission decisions, CSA checks, invariant violations
//! - **Gauge**: active connections in the concurrency table
//! - **Histogram**: time spent evaluating admission rules

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Admission decisions by requested mode and outcome (allowed/rejected)
    pub static ref ADMISSION_DECISIONS: CounterVec = CounterVec::new(
        Opts::new("pm_admission_decisions_total", "Concurrency admission decisions"),
        &["mode", "outcome"]
    ).expect("metric creation failed");

    /// Time spent evaluating the admission rules
    pub static ref ADMISSION_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "pm_admission_duration_seconds",
            "Time spent evaluating concurrency admission rules"
        ).buckets(exponential_buckets(0.000_001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Channel-switch admission checks by outcome
    pub static ref CSA_CHECKS: CounterVec = CounterVec::new(
        Opts::new("pm_csa_checks_total", "Channel switch admission checks"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Connections currently in the concurrency table
    pub static ref ACTIVE_CONNECTIONS: Gauge = Gauge::new(
        "pm_active_connections",
        "Connections currently in the concurrency table"
    ).expect("metric creation failed");

    /// Invariant violations detected by table validation
    pub static ref INVARIANT_VIOLATIONS: Counter = Counter::new(
        "pm_invariant_violations_total",
        "Connection table invariant violations"
    ).expect("metric creation failed");

    /// Session lifecycle events by mode and event (start/stop)
    pub static ref SESSION_EVENTS: CounterVec = CounterVec::new(
        Opts::new("pm_session_events_total", "Session start and stop events"),
        &["mode", "event"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ADMISSION_DECISIONS.clone()),
        Box::new(ADMISSION_DURATION.clone()),
        Box::new(CSA_CHECKS.clone()),
        Box::new(ACTIVE_CONNECTIONS.clone()),
        Box::new(INVARIANT_VIOLATIONS.clone()),
        Box::new(SESSION_EVENTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_encode() {
        // May fail if already registered by another test, which is fine
        let _ = register_metrics();
        ACTIVE_CONNECTIONS.set(2.0);
        let text = encode_metrics().unwrap();
        assert!(text.contains("pm_active_connections"));
    }

    #[test]
    fn test_counter_increment() {
        INVARIANT_VIOLATIONS.inc();
        assert!(INVARIANT_VIOLATIONS.get() >= 1.0);
    }

    #[test]
    fn test_histogram_timer() {
        {
            let _timer = HistogramTimer::new(&ADMISSION_DURATION);
        }
        assert!(ADMISSION_DURATION.get_sample_count() >= 1);
    }
}
