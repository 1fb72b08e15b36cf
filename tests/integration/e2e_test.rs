//! End-to-end tests: feed -> cache -> engine -> queue -> consumer

use async_trait::async_trait;
use price_alert::cache::PriceCache;
use price_alert::consumer::{AlertSink, Consumer};
use price_alert::engine::{await_with_grace, AlertEngine, EngineState};
use price_alert::evaluator::Evaluator;
use price_alert::queue::{AlertEvent, EventQueue};
use price_alert::rules::{AlertRule, Condition, RuleSet};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct ChannelSink {
    tx: mpsc::UnboundedSender<AlertEvent>,
}

#[async_trait]
impl AlertSink for ChannelSink {
    async fn consume(&self, event: AlertEvent) -> anyhow::Result<()> {
        self.tx.send(event)?;
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_price_drop_reaches_sink() {
    let rules = Arc::new(
        RuleSet::new(vec![
            AlertRule::new("alert_1", "1", Condition::Below, dec!(40000000)),
            AlertRule::new("alert_2", "2", Condition::Above, dec!(35000000)),
        ])
        .unwrap(),
    );
    let cache = PriceCache::new();
    cache.update("1", dec!(45000000)).await;
    cache.update("2", dec!(32000000)).await;

    let queue = EventQueue::with_defaults();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let consumer = tokio::spawn(Consumer::new(queue.clone(), ChannelSink { tx }).run());

    let evaluator = Evaluator::new(rules, cache.clone(), queue.clone());
    let engine = Arc::new(AlertEngine::new(evaluator, Duration::from_millis(20)));
    let runner = engine.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    // Nothing crosses yet
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(rx.try_recv().is_err());

    cache.update("1", dec!(39000000)).await;
    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.rule_id, "alert_1");
    assert_eq!(event.product_id, "1");
    assert_eq!(event.price, dec!(39000000));

    assert!(engine.stop());
    assert!(!engine.stop());
    handle.await.unwrap();
    assert_eq!(engine.state(), EngineState::Stopped);

    let stats = await_with_grace(consumer, Duration::from_secs(1)).await.unwrap();
    assert!(stats.delivered >= 1);
    assert!(queue.is_closed());
}
