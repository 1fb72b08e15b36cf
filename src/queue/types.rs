//! Alert queue types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One triggered rule at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Rule that fired
    pub rule_id: String,
    /// Product whose price crossed the threshold
    pub product_id: String,
    /// Human readable description of the crossing
    pub message: String,
    /// Observed price at evaluation time
    pub price: Decimal,
    /// Wall-clock time the event was created
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    /// Create an event stamped with the current time
    pub fn new(
        rule_id: impl Into<String>,
        product_id: impl Into<String>,
        message: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            product_id: product_id.into(),
            message: message.into(),
            price,
            timestamp: Utc::now(),
        }
    }
}

/// What a push does when the queue is at capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Discard the incoming event
    #[default]
    DropNewest,
    /// Evict the oldest queued event to make room
    DropOldest,
    /// Wait up to the given duration for room, then discard the incoming event
    BlockWithTimeout(Duration),
}

/// Result of a single push
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Event queued without loss
    Enqueued,
    /// Event queued after evicting the returned older event
    Evicted(AlertEvent),
    /// Queue was full; the event was discarded
    Dropped,
    /// Queue has been closed; the event was discarded
    Closed,
}

impl PushOutcome {
    /// Whether the pushed event is now in the queue
    pub fn is_enqueued(&self) -> bool {
        matches!(self, PushOutcome::Enqueued | PushOutcome::Evicted(_))
    }
}

/// Queue counters since creation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub pushed: u64,
    pub dropped: u64,
    pub evicted: u64,
    pub received: u64,
}
