//! Telemetry module
//!
//! Structured logging and lightweight metric hooks

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{record_latency, set_gauge, GaugeMetric, LatencyMetric};

use crate::config::TelemetryConfig;

/// Guard that cleans up telemetry on drop
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level)?;

    Ok(TelemetryGuard { _priv: () })
}
