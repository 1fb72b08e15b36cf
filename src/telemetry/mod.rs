//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
pub mod metrics;

pub use self::logging::{init_logging, LogFormat};
pub use self::metrics::{init_metrics, CounterMetric};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
    }

    Ok(())
}
