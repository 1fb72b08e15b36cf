//! Prometheus metrics

use std::net::SocketAddr;
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Completed evaluation ticks
    Ticks,
    /// Rules whose condition held on a tick
    AlertsTriggered,
    /// Alerts lost to a full or closed queue
    AlertsDropped,
    /// Older alerts evicted to make room
    AlertsEvicted,
    /// Active rules skipped because no price was known
    LookupMisses,
    /// Alerts handed to the sink
    AlertsConsumed,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::Ticks => "price_alert_ticks_total",
            CounterMetric::AlertsTriggered => "price_alert_alerts_triggered_total",
            CounterMetric::AlertsDropped => "price_alert_alerts_dropped_total",
            CounterMetric::AlertsEvicted => "price_alert_alerts_evicted_total",
            CounterMetric::LookupMisses => "price_alert_lookup_miss_total",
            CounterMetric::AlertsConsumed => "price_alert_alerts_consumed_total",
        }
    }
}

/// Increment a counter
pub fn increment(metric: CounterMetric, value: u64) {
    if value > 0 {
        metrics::counter!(metric.name()).increment(value);
    }
}

/// Record how long one evaluation tick took
pub fn record_tick_duration(duration: Duration) {
    metrics::histogram!("price_alert_tick_duration_ms").record(duration.as_secs_f64() * 1000.0);
}

/// Set the current queue depth
pub fn set_queue_depth(depth: usize) {
    metrics::gauge!("price_alert_queue_depth").set(depth as f64);
}

/// Install the Prometheus exporter with an HTTP scrape endpoint
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics endpoint listening");
    Ok(())
}
