//! Tracing Diagnostics Adapter
//!
//! Implements the `DiagnosticSink` port on top of `tracing`: alerts are
//! logged at error level and counted, and the first alert switches off
//! verbose table dumps so a broken table does not flood the log.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::error;

use crate::ports::outbound::DiagnosticSink;

/// Diagnostic sink backed by the tracing subscriber.
#[derive(Debug)]
pub struct TracingDiagnostics {
    alerts: AtomicU64,
    verbose: AtomicBool,
}

impl TracingDiagnostics {
    /// Create a sink with verbose dumps enabled.
    pub fn new() -> Self {
        Self {
            alerts: AtomicU64::new(0),
            verbose: AtomicBool::new(true),
        }
    }

    /// Alerts raised so far.
    pub fn alert_count(&self) -> u64 {
        self.alerts.load(Ordering::Relaxed)
    }

    /// Re-enable verbose dumps after an alert was handled.
    pub fn reset_verbose(&self) {
        self.verbose.store(true, Ordering::Relaxed);
    }
}

impl Default for TracingDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for TracingDiagnostics {
    fn raise_alert(&self, description: &str) {
        let total = self.alerts.fetch_add(1, Ordering::Relaxed) + 1;
        self.verbose.store(false, Ordering::Relaxed);
        error!(alerts = total, "[pm] policy manager alert: {}", description);
    }

    fn verbose_enabled(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }
}
