//! Integration tests for price feeds

use price_alert::cache::PriceCache;
use price_alert::feed::{pump, PriceFeed, StaticFeed};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_static_feed_populates_cache() {
    let feed = StaticFeed::new([
        ("1".to_string(), dec!(45000000)),
        ("2".to_string(), dec!(32000000)),
        ("1".to_string(), dec!(44000000)),
    ]);
    let cache = PriceCache::new();

    let applied = pump(feed.subscribe().await.unwrap(), cache.clone()).await;
    assert_eq!(applied, 3);

    let snapshot = cache.snapshot().await;
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["1"], dec!(44000000));
}
