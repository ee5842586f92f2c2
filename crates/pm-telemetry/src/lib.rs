//! # PM Telemetry
//!
//! Logging and metrics for the WLAN policy manager.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter`, plain or JSON output
//! - **Metrics**: Prometheus counters and gauges for admission decisions,
//!   active connections and invariant violations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pm_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PM_SERVICE_NAME` | `wlan-policy-manager` | Service name in log lines |
//! | `PM_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `PM_JSON_LOGS` | `false` | Emit JSON formatted logs |
//! | `PM_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, ACTIVE_CONNECTIONS, ADMISSION_DECISIONS,
    ADMISSION_DURATION, CSA_CHECKS, INVARIANT_VIOLATIONS, SESSION_EVENTS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Prometheus registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Configuration value rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register the metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let logging = init_logging(config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Log an event tied to a vdev with the standard fields.
///
/// # Example
///
/// ```rust,ignore
/// log_vdev_event!(info, "session started", vdev_id, mode, freq = 5180);
/// ```
#[macro_export]
macro_rules! log_vdev_event {
    ($level:ident, $msg:expr, $vdev_id:expr, $mode:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = "policy-manager",
            vdev_id = $vdev_id,
            mode = %$mode,
            $($($field)*,)?
            $msg
        )
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_inc_macro() {
        metric_inc!(ADMISSION_DECISIONS, &["STA", "allowed"]);
        assert!(ADMISSION_DECISIONS.with_label_values(&["STA", "allowed"]).get() >= 1.0);
    }

    #[test]
    fn test_error_display() {
        let err = TelemetryError::Config("bad level".to_string());
        assert!(err.to_string().contains("bad level"));
    }
}
