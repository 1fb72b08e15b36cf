//! Alert event queue
//!
//! Bounded handoff between the evaluator and alert consumers. Producers
//! never wait on a full queue unless the overflow policy asks them to;
//! consumers park until an event arrives or the queue is closed.

mod types;

pub use types::{AlertEvent, OverflowPolicy, PushOutcome, QueueStats};

use crossbeam_queue::ArrayQueue;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Default queue capacity
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug)]
struct Shared {
    buffer: ArrayQueue<AlertEvent>,
    closed: AtomicBool,
    policy: OverflowPolicy,
    items_available: Notify,
    space_available: Notify,
    pushed: AtomicU64,
    dropped: AtomicU64,
    evicted: AtomicU64,
    received: AtomicU64,
}

/// Bounded multi-producer, multi-consumer alert queue
///
/// Clones share the same underlying buffer.
#[derive(Debug, Clone)]
pub struct EventQueue {
    shared: Arc<Shared>,
}

impl EventQueue {
    /// Create a queue; a zero capacity is raised to one
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            shared: Arc::new(Shared {
                buffer: ArrayQueue::new(capacity.max(1)),
                closed: AtomicBool::new(false),
                policy,
                items_available: Notify::new(),
                space_available: Notify::new(),
                pushed: AtomicU64::new(0),
                dropped: AtomicU64::new(0),
                evicted: AtomicU64::new(0),
                received: AtomicU64::new(0),
            }),
        }
    }

    /// Create a queue with the default capacity and drop-newest policy
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, OverflowPolicy::DropNewest)
    }

    /// Push an event according to the configured overflow policy
    ///
    /// Only `BlockWithTimeout` can suspend the caller, and never longer than
    /// its timeout.
    pub async fn push(&self, event: AlertEvent) -> PushOutcome {
        match self.shared.policy {
            OverflowPolicy::DropNewest => self.try_push(event),
            OverflowPolicy::DropOldest => self.push_evicting(event),
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.push_waiting(event, Instant::now() + timeout).await
            }
        }
    }

    /// Push without waiting, discarding the event if the queue is full
    pub fn try_push(&self, event: AlertEvent) -> PushOutcome {
        if self.is_closed() {
            return PushOutcome::Closed;
        }
        match self.shared.buffer.push(event) {
            Ok(()) => {
                self.enqueued();
                PushOutcome::Enqueued
            }
            Err(_) => {
                self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                PushOutcome::Dropped
            }
        }
    }

    fn enqueued(&self) {
        self.shared.pushed.fetch_add(1, Ordering::Relaxed);
        self.shared.items_available.notify_one();
    }

    fn push_evicting(&self, event: AlertEvent) -> PushOutcome {
        if self.is_closed() {
            return PushOutcome::Closed;
        }
        let evicted = self.shared.buffer.force_push(event);
        self.enqueued();
        match evicted {
            Some(old) => {
                self.shared.evicted.fetch_add(1, Ordering::Relaxed);
                PushOutcome::Evicted(old)
            }
            None => PushOutcome::Enqueued,
        }
    }

    async fn push_waiting(&self, mut event: AlertEvent, deadline: Instant) -> PushOutcome {
        loop {
            let space = self.shared.space_available.notified();
            tokio::pin!(space);
            space.as_mut().enable();

            if self.is_closed() {
                return PushOutcome::Closed;
            }
            match self.shared.buffer.push(event) {
                Ok(()) => {
                    self.enqueued();
                    return PushOutcome::Enqueued;
                }
                Err(returned) => event = returned,
            }

            if tokio::time::timeout_at(deadline, space).await.is_err() {
                // One last try in case room appeared right at the deadline
                return self.try_push(event);
            }
        }
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the queue is closed and fully drained.
    pub async fn recv(&self) -> Option<AlertEvent> {
        loop {
            let items = self.shared.items_available.notified();
            tokio::pin!(items);
            items.as_mut().enable();

            if let Some(event) = self.try_recv() {
                return Some(event);
            }
            if self.is_closed() {
                // Catch a push that landed between the pop and the flag check
                return self.try_recv();
            }

            items.await;
        }
    }

    /// Take the next event if one is queued
    pub fn try_recv(&self) -> Option<AlertEvent> {
        let event = self.shared.buffer.pop()?;
        self.shared.received.fetch_add(1, Ordering::Relaxed);
        self.shared.space_available.notify_one();
        Some(event)
    }

    /// Stop accepting events and wake every waiter
    ///
    /// Queued events stay available to `recv`. Returns `false` if the queue
    /// was already closed.
    pub fn close(&self) -> bool {
        let newly_closed = !self.shared.closed.swap(true, Ordering::AcqRel);
        if newly_closed {
            self.shared.items_available.notify_waiters();
            self.shared.space_available.notify_waiters();
        }
        newly_closed
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.shared.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.shared.buffer.capacity()
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.shared.policy
    }

    /// Snapshot of the queue counters
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            pushed: self.shared.pushed.load(Ordering::Relaxed),
            dropped: self.shared.dropped.load(Ordering::Relaxed),
            evicted: self.shared.evicted.load(Ordering::Relaxed),
            received: self.shared.received.load(Ordering::Relaxed),
        }
    }
}
