//! Alert engine lifecycle
//!
//! Drives the evaluator on a fixed interval and owns the shutdown signal.
//! The engine starts `Running` and moves to `Stopped` exactly once.

use crate::evaluator::Evaluator;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Lifecycle state of an [`AlertEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Stopped,
}

/// Periodic evaluation loop with cooperative shutdown
pub struct AlertEngine {
    evaluator: Evaluator,
    tick_interval: Duration,
    stopped: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
}

impl AlertEngine {
    /// Create an engine ticking every `tick_interval`
    pub fn new(evaluator: Evaluator, tick_interval: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            evaluator,
            tick_interval,
            stopped: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    pub fn state(&self) -> EngineState {
        if self.stopped.load(Ordering::SeqCst) {
            EngineState::Stopped
        } else {
            EngineState::Running
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Request shutdown
    ///
    /// Only the first call has an effect and returns `true`; later calls
    /// are no-ops.
    pub fn stop(&self) -> bool {
        if self
            .stopped
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            tracing::info!("Stopping alert engine");
            self.shutdown_tx.send_replace(true);
            true
        } else {
            tracing::debug!("Alert engine already stopped");
            false
        }
    }

    /// Tick until [`stop`](Self::stop) is called
    pub async fn run(&self) {
        self.run_until(std::future::pending::<()>()).await;
    }

    /// Tick until stopped or until `cancel` completes
    ///
    /// A tick that has started always runs to completion; shutdown is
    /// noticed on the next scheduling decision. The alert queue is closed
    /// when the loop exits.
    pub async fn run_until<F>(&self, cancel: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let mut shutdown = self.shutdown_tx.subscribe();
        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.tick_interval.as_millis() as u64,
            rules = self.evaluator.rules().len(),
            "Alert engine running"
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                biased;

                _ = shutdown.changed() => {}
                _ = &mut cancel => {
                    tracing::info!("Received cancellation");
                    self.stop();
                }
                _ = ticker.tick() => {
                    self.evaluator.tick().await;
                }
            }
        }

        self.evaluator.queue().close();
        tracing::info!("Alert engine stopped");
    }
}

/// Wait for a task for at most `grace`
///
/// Returns `None` if the grace period elapsed or the task failed. The task
/// keeps running in the background when the wait times out.
pub async fn await_with_grace<T>(handle: JoinHandle<T>, grace: Duration) -> Option<T> {
    match tokio::time::timeout(grace, handle).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Task failed during shutdown");
            None
        }
        Err(_) => {
            tracing::warn!(
                grace_ms = grace.as_millis() as u64,
                "Grace period elapsed before task finished"
            );
            None
        }
    }
}
