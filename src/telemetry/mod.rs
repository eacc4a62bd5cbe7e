//! Telemetry module
//!
//! Logging and metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, record_fetch, record_outcome, FetchKind};

use crate::config::TelemetryConfig;

/// Guard that cleans up telemetry on drop
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
    }

    Ok(TelemetryGuard { _priv: () })
}
