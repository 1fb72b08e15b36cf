//! Integration tests for configuration loading

use price_alert::config::Config;
use price_alert::queue::OverflowPolicy;

#[test]
fn test_config_example_is_valid() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let rules = config.validate().unwrap();

    assert_eq!(config.engine.tick_interval_secs, 30);
    assert_eq!(config.engine.grace_period_ms, 100);
    assert_eq!(config.queue.capacity, 100);
    assert_eq!(config.queue.policy(), OverflowPolicy::DropNewest);
    assert_eq!(rules.active_rules().count(), 1);
    assert_eq!(config.prices.len(), 2);
}

#[test]
fn test_unknown_condition_rejected_at_load() {
    let config: Config = toml::from_str(
        r#"
        [[rules]]
        id = "alert_1"
        product_id = "1"
        condition = "between"
        threshold = 40000000
        "#,
    )
    .unwrap();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("between"));
}
