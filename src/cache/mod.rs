//! Price cache module
//!
//! Shared table of the latest observed price per product

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Point-in-time copy of the price table
pub type PriceSnapshot = HashMap<String, Decimal>;

/// Concurrent product id -> latest price mapping
///
/// Cloning the cache yields another handle to the same table. Readers
/// proceed in parallel; an update is exclusive with every reader and writer.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    prices: Arc<RwLock<PriceSnapshot>>,
}

impl PriceCache {
    /// Create an empty price cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with prices
    pub fn with_prices(prices: impl IntoIterator<Item = (String, Decimal)>) -> Self {
        Self {
            prices: Arc::new(RwLock::new(prices.into_iter().collect())),
        }
    }

    /// Replace the stored price for a product (last write wins)
    pub async fn update(&self, product_id: impl Into<String>, price: Decimal) {
        let product_id = product_id.into();
        let mut prices = self.prices.write().await;
        tracing::trace!(product_id = %product_id, %price, "Price updated");
        prices.insert(product_id, price);
    }

    /// Copy the full table; the copy is safe to iterate without the lock
    pub async fn snapshot(&self) -> PriceSnapshot {
        self.prices.read().await.clone()
    }

    /// Latest price for a single product
    pub async fn get(&self, product_id: &str) -> Option<Decimal> {
        self.prices.read().await.get(product_id).copied()
    }

    /// Number of products with a known price
    pub async fn len(&self) -> usize {
        self.prices.read().await.len()
    }

    /// Whether no price has been observed yet
    pub async fn is_empty(&self) -> bool {
        self.prices.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_update_and_get() {
        let cache = PriceCache::new();
        assert!(cache.is_empty().await);

        cache.update("1", dec!(45000000)).await;
        assert_eq!(cache.get("1").await, Some(dec!(45000000)));
        assert_eq!(cache.get("2").await, None);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = PriceCache::new();
        cache.update("1", dec!(100)).await;
        cache.update("1", dec!(-5)).await;
        assert_eq!(cache.get("1").await, Some(dec!(-5)));
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let cache = PriceCache::with_prices([("1".to_string(), dec!(10))]);
        let snapshot = cache.snapshot().await;

        cache.update("1", dec!(20)).await;
        cache.update("2", dec!(30)).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["1"], dec!(10));
        assert_eq!(cache.get("1").await, Some(dec!(20)));
    }

    #[tokio::test]
    async fn test_clone_shares_table() {
        let cache = PriceCache::new();
        let handle = cache.clone();
        handle.update("1", dec!(1)).await;
        assert_eq!(cache.get("1").await, Some(dec!(1)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_never_tear() {
        let cache = PriceCache::new();
        let written: Vec<Decimal> = (0..50)
            .map(|i| Decimal::new(123_456_789_012 + i, 4))
            .collect();

        let mut handles = Vec::new();
        for (i, price) in written.iter().copied().enumerate() {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                // Overlapping keys: five products shared by fifty writers
                cache.update(format!("p{}", i % 5), price).await;
            }));
        }
        for _ in 0..10 {
            let cache = cache.clone();
            let written = written.clone();
            handles.push(tokio::spawn(async move {
                for price in cache.snapshot().await.values() {
                    assert!(written.contains(price));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.len(), 5);
        for price in snapshot.values() {
            assert!(written.contains(price));
        }
    }
}
