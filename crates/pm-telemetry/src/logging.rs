//! Structured logging setup.
//!
//! Development builds get a compact human-readable layer; `json_logs`
//! switches to one JSON object per line with target, thread id, file and
//! line number.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Logging handle returned by [`init_logging`].
pub struct LoggingGuard {
    /// False when another subscriber was already installed.
    pub installed: bool,
}

/// Install the global subscriber.
///
/// A second call (or a subscriber installed by the host) is not an error:
/// the existing subscriber stays in place and `installed` is false.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    if !config.console_output {
        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .try_init()
            .is_ok();
        return Ok(LoggingGuard { installed });
    }

    let installed = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(
            service = %config.service_name,
            json_logs = config.json_logs,
            "Logging initialized"
        );
    }

    Ok(LoggingGuard { installed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        let config = TelemetryConfig::default().with_log_level("policy_manager=notalevel");
        assert!(matches!(init_logging(&config), Err(TelemetryError::Config(_))));
    }

    #[test]
    fn test_second_init_is_not_an_error() {
        let config = TelemetryConfig::default().with_log_level("warn");
        let _first = init_logging(&config).unwrap();
        let second = init_logging(&config).unwrap();
        assert!(!second.installed);
    }
}
