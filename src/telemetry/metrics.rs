//! Prometheus metrics

use crate::sport::Sport;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Rates written to the cache
    LinesIngested,
    /// Failed feed fetches
    FeedFetchErrors,
    /// Failed cache reads during a subscription tick
    CacheReadErrors,
    /// Delta responses delivered to subscribers
    ResponsesSent,
    /// Delta responses that failed to send
    SendErrors,
    /// Subscription requests rejected at parse time
    RequestsRejected,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Open subscription streams
    ActiveStreams,
    /// Running subscription tasks
    ActiveSubscriptions,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::LinesIngested => "lines_ingested_total",
            CounterMetric::FeedFetchErrors => "feed_fetch_errors_total",
            CounterMetric::CacheReadErrors => "cache_read_errors_total",
            CounterMetric::ResponsesSent => "subscription_responses_sent_total",
            CounterMetric::SendErrors => "subscription_send_errors_total",
            CounterMetric::RequestsRejected => "subscription_requests_rejected_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::ActiveStreams => "active_streams",
            GaugeMetric::ActiveSubscriptions => "active_subscriptions",
        }
    }
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Increment a per-sport counter
pub fn increment_sport_counter(metric: CounterMetric, sport: Sport) {
    metrics::counter!(metric.name(), "sport" => sport.as_str()).increment(1);
}

/// Adjust a gauge by `delta`
pub fn adjust_gauge(metric: GaugeMetric, delta: f64) {
    metrics::gauge!(metric.name()).increment(delta);
}

/// Record time from a completed fetch to its cache write
pub fn record_ingest_lag(sport: Sport, lag: Duration) {
    metrics::histogram!("line_ingest_lag_ms", "sport" => sport.as_str())
        .record(lag.as_secs_f64() * 1000.0);
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}
