//! Configuration types for price-alert

use crate::queue::OverflowPolicy;
use crate::rules::{RuleError, RuleSet};
use crate::telemetry::LogFormat;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Alert rules, evaluated in file order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    /// Prices loaded into the cache at startup
    #[serde(default)]
    pub prices: Vec<SeedPrice>,
}

/// Evaluation loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Seconds between evaluation ticks
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Milliseconds to wait for the consumer after shutdown
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
}

fn default_tick_interval_secs() -> u64 {
    30
}
fn default_grace_period_ms() -> u64 {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30,
            grace_period_ms: 100,
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

/// Overflow policy as written in the config file
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowMode {
    #[default]
    DropNewest,
    DropOldest,
    Block,
}

/// Alert queue configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of unconsumed alerts
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// What to do when the queue is full
    #[serde(default)]
    pub overflow: OverflowMode,

    /// Upper bound on a blocked push (block mode only)
    #[serde(default = "default_block_timeout_ms")]
    pub block_timeout_ms: u64,
}

fn default_capacity() -> usize {
    crate::queue::DEFAULT_CAPACITY
}
fn default_block_timeout_ms() -> u64 {
    50
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: crate::queue::DEFAULT_CAPACITY,
            overflow: OverflowMode::DropNewest,
            block_timeout_ms: 50,
        }
    }
}

impl QueueConfig {
    /// Resolve the runtime overflow policy
    pub fn policy(&self) -> OverflowPolicy {
        match self.overflow {
            OverflowMode::DropNewest => OverflowPolicy::DropNewest,
            OverflowMode::DropOldest => OverflowPolicy::DropOldest,
            OverflowMode::Block => {
                OverflowPolicy::BlockWithTimeout(Duration::from_millis(self.block_timeout_ms))
            }
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus scrape port; metrics export is off when unset
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// A single alert rule as written in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub id: String,
    pub product_id: String,
    /// "below" or "above"; anything else fails validation
    pub condition: String,
    pub threshold: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Initial price for a product
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPrice {
    pub product_id: String,
    pub price: Decimal,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid rule: {0}")]
    Rule(#[from] RuleError),
    #[error("engine.tick_interval_secs must be greater than zero")]
    ZeroTickInterval,
    #[error("queue.capacity must be greater than zero")]
    ZeroCapacity,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, returning `None` only when the file does not exist
    ///
    /// Unreadable or malformed files are errors.
    pub fn load_optional(path: impl AsRef<std::path::Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to read config {}", path.display())))
            }
        };
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(Some(config))
    }

    /// Check settings and build the rule set
    pub fn validate(&self) -> Result<RuleSet, ConfigError> {
        if self.engine.tick_interval_secs == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.queue.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(RuleSet::from_config(&self.rules)?)
    }
}
