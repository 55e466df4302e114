//! Telemetry module
//!
//! Logging and metrics

mod logging;
mod metrics;

pub use self::logging::init_logging;
pub use self::metrics::{
    adjust_gauge, increment_counter, increment_sport_counter, install_metrics, record_ingest_lag,
    CounterMetric, GaugeMetric,
};

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusHandle;

/// Handles kept alive for the lifetime of the process
pub struct TelemetryGuard {
    /// Renders the Prometheus exposition text
    pub metrics: PrometheusHandle,
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;
    let metrics = install_metrics()?;

    Ok(TelemetryGuard { metrics })
}
