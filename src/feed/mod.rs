//! Price feed module
//!
//! Upstream suppliers of price updates and the pump that applies them to
//! the price cache

mod static_feed;
mod types;

pub use static_feed::StaticFeed;
pub use types::PriceUpdate;

use crate::cache::PriceCache;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Trait for price feed implementations
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Subscribe to price updates
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<PriceUpdate>>;
}

/// Apply updates to the cache until the feed closes
///
/// Returns the number of updates applied.
pub async fn pump(mut rx: mpsc::Receiver<PriceUpdate>, cache: PriceCache) -> u64 {
    let mut applied = 0;
    while let Some(update) = rx.recv().await {
        tracing::debug!(product_id = %update.product_id, price = %update.price, "Price update");
        cache.update(update.product_id, update.price).await;
        applied += 1;
    }
    tracing::debug!(applied, "Price feed closed");
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_pump_applies_updates_in_order() {
        let cache = PriceCache::new();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(pump(rx, cache.clone()));

        tx.send(PriceUpdate::new("1", dec!(45000000))).await.unwrap();
        tx.send(PriceUpdate::new("1", dec!(39000000))).await.unwrap();
        tx.send(PriceUpdate::new("2", dec!(32000000))).await.unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap(), 3);
        assert_eq!(cache.get("1").await, Some(dec!(39000000)));
        assert_eq!(cache.get("2").await, Some(dec!(32000000)));
    }
}
