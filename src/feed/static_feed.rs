//! Fixed list of prices, emitted once

use super::{PriceFeed, PriceUpdate};
use crate::config::SeedPrice;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

/// Feed that publishes a fixed set of prices and then closes
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    prices: Vec<(String, Decimal)>,
}

impl StaticFeed {
    pub fn new(prices: impl IntoIterator<Item = (String, Decimal)>) -> Self {
        Self {
            prices: prices.into_iter().collect(),
        }
    }

    /// Build from the `[[prices]]` config entries
    pub fn from_config(seeds: &[SeedPrice]) -> Self {
        Self::new(seeds.iter().map(|s| (s.product_id.clone(), s.price)))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<PriceUpdate>> {
        let (tx, rx) = mpsc::channel(self.prices.len().max(1));
        for (product_id, price) in &self.prices {
            tx.send(PriceUpdate::new(product_id.clone(), *price))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to send price update: {}", e))?;
        }
        tracing::info!(count = self.prices.len(), "Static price feed published");
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_static_feed_emits_then_closes() {
        let feed = StaticFeed::new([
            ("1".to_string(), dec!(45000000)),
            ("2".to_string(), dec!(32000000)),
        ]);
        let mut rx = feed.subscribe().await.unwrap();

        assert_eq!(rx.recv().await.unwrap().product_id, "1");
        assert_eq!(rx.recv().await.unwrap().price, dec!(32000000));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_static_feed() {
        let feed = StaticFeed::default();
        assert!(feed.is_empty());
        let mut rx = feed.subscribe().await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_from_config() {
        let feed = StaticFeed::from_config(&[SeedPrice {
            product_id: "1".to_string(),
            price: dec!(45000000),
        }]);
        assert_eq!(feed.len(), 1);
    }
}
