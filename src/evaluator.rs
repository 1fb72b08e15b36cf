//! Rule evaluation
//!
//! Each tick compares every active rule against a snapshot of the price
//! cache and pushes an alert for every rule whose condition holds. The
//! rule set and the price snapshot are read independently; a price update
//! that lands after the snapshot is seen on the next tick.

use crate::cache::{PriceCache, PriceSnapshot};
use crate::queue::{AlertEvent, EventQueue, PushOutcome};
use crate::rules::{AlertRule, RuleSet};
use crate::telemetry::metrics::{self, CounterMetric};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;

/// Counts from a single tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Active rules looked at
    pub evaluated: usize,
    /// Active rules with no known price
    pub skipped: usize,
    /// Rules whose condition held
    pub triggered: usize,
    /// Alerts accepted by the queue
    pub enqueued: usize,
    /// Alerts lost to overflow or a closed queue
    pub dropped: usize,
}

/// Build the alert for `rule` if `price` satisfies it
pub fn evaluate(rule: &AlertRule, price: Decimal) -> Option<AlertEvent> {
    if !rule.is_triggered_by(price) {
        return None;
    }
    Some(AlertEvent::new(
        rule.id.clone(),
        rule.product_id.clone(),
        rule.condition.message(),
        price,
    ))
}

/// Evaluate every active rule against a price snapshot
///
/// Events come back in rule definition order.
pub fn evaluate_all(rules: &RuleSet, prices: &PriceSnapshot) -> (Vec<AlertEvent>, TickReport) {
    let mut report = TickReport::default();
    let mut events = Vec::new();

    for rule in rules.active_rules() {
        report.evaluated += 1;

        let Some(&price) = prices.get(&rule.product_id) else {
            tracing::debug!(
                rule_id = %rule.id,
                product_id = %rule.product_id,
                "No price yet, skipping rule"
            );
            report.skipped += 1;
            continue;
        };

        if let Some(event) = evaluate(rule, price) {
            report.triggered += 1;
            events.push(event);
        }
    }

    (events, report)
}

/// Periodic rule evaluator feeding the alert queue
#[derive(Debug, Clone)]
pub struct Evaluator {
    rules: Arc<RuleSet>,
    cache: PriceCache,
    queue: EventQueue,
}

impl Evaluator {
    pub fn new(rules: Arc<RuleSet>, cache: PriceCache, queue: EventQueue) -> Self {
        Self { rules, cache, queue }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Run one evaluation pass
    ///
    /// Never fails: missing prices are skipped and overflow drops alerts.
    pub async fn tick(&self) -> TickReport {
        let started = Instant::now();
        let prices = self.cache.snapshot().await;
        let (events, mut report) = evaluate_all(&self.rules, &prices);

        for event in events {
            let rule_id = event.rule_id.clone();
            let product_id = event.product_id.clone();
            let price = event.price;

            match self.queue.push(event).await {
                PushOutcome::Enqueued => {
                    report.enqueued += 1;
                    tracing::warn!(
                        rule_id = %rule_id,
                        product_id = %product_id,
                        %price,
                        "alert triggered"
                    );
                }
                PushOutcome::Evicted(old) => {
                    report.enqueued += 1;
                    metrics::increment(CounterMetric::AlertsEvicted, 1);
                    tracing::warn!(
                        rule_id = %rule_id,
                        product_id = %product_id,
                        %price,
                        "alert triggered"
                    );
                    tracing::error!(
                        evicted_rule_id = %old.rule_id,
                        evicted_at = %old.timestamp,
                        "alert queue full, evicted oldest event"
                    );
                }
                PushOutcome::Dropped => {
                    report.dropped += 1;
                    tracing::error!(
                        rule_id = %rule_id,
                        product_id = %product_id,
                        "alert queue full, dropping event"
                    );
                }
                PushOutcome::Closed => {
                    report.dropped += 1;
                    tracing::error!(rule_id = %rule_id, "alert queue closed, dropping event");
                }
            }
        }

        metrics::increment(CounterMetric::Ticks, 1);
        metrics::increment(CounterMetric::LookupMisses, report.skipped as u64);
        metrics::increment(CounterMetric::AlertsTriggered, report.triggered as u64);
        metrics::increment(CounterMetric::AlertsDropped, report.dropped as u64);
        metrics::set_queue_depth(self.queue.len());
        metrics::record_tick_duration(started.elapsed());

        tracing::debug!(
            evaluated = report.evaluated,
            skipped = report.skipped,
            triggered = report.triggered,
            dropped = report.dropped,
            "Tick complete"
        );

        report
    }
}
