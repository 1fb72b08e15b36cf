//! Alert consumption
//!
//! Drains the alert queue and hands each event to an [`AlertSink`].

use crate::queue::{AlertEvent, EventQueue};
use crate::telemetry::metrics::{self, CounterMetric};
use async_trait::async_trait;

/// Destination for triggered alerts
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver a single alert
    async fn consume(&self, event: AlertEvent) -> anyhow::Result<()>;
}

/// Sink that writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    async fn consume(&self, event: AlertEvent) -> anyhow::Result<()> {
        tracing::info!(
            rule = %event.rule_id,
            product = %event.product_id,
            price = %event.price,
            alert_message = %event.message,
            triggered_at = %event.timestamp,
            "processing alert"
        );
        Ok(())
    }
}

/// Totals from a consumer run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Drains a queue into a sink
pub struct Consumer<S: AlertSink> {
    queue: EventQueue,
    sink: S,
}

impl<S: AlertSink> Consumer<S> {
    pub fn new(queue: EventQueue, sink: S) -> Self {
        Self { queue, sink }
    }

    /// Process alerts until the queue is closed and empty
    ///
    /// A failing sink does not stop the loop; the error is logged and the
    /// event is not retried.
    pub async fn run(self) -> ConsumerStats {
        let mut stats = ConsumerStats::default();

        while let Some(event) = self.queue.recv().await {
            let rule_id = event.rule_id.clone();
            match self.sink.consume(event).await {
                Ok(()) => {
                    stats.delivered += 1;
                    metrics::increment(CounterMetric::AlertsConsumed, 1);
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!(rule_id = %rule_id, error = %e, "Alert sink failed");
                }
            }
        }

        tracing::info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "Alert consumer shutting down"
        );
        stats
    }
}
