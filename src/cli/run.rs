//! Run command implementation

use crate::cache::PriceCache;
use crate::config::{Config, SeedPrice};
use crate::consumer::{Consumer, LogSink};
use crate::engine::{await_with_grace, AlertEngine};
use crate::evaluator::Evaluator;
use crate::feed::{self, PriceFeed, StaticFeed};
use crate::queue::EventQueue;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override engine.tick_interval_secs
    #[arg(long)]
    pub tick_interval_secs: Option<u64>,
}

impl RunArgs {
    /// Run the engine until Ctrl-C or SIGTERM
    ///
    /// Prices come only from the `[[prices]]` entries, which are loaded
    /// into the cache once before the first tick. Nothing updates the
    /// cache afterwards, so every tick evaluates the same seeded prices.
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let rules = Arc::new(config.validate()?);
        let tick_interval = match self.tick_interval_secs {
            Some(0) => anyhow::bail!("--tick-interval-secs must be greater than zero"),
            Some(secs) => Duration::from_secs(secs),
            None => config.engine.tick_interval(),
        };

        let cache = seed_cache(&config.prices).await?;

        let queue = EventQueue::new(config.queue.capacity, config.queue.policy());
        let consumer = tokio::spawn(Consumer::new(queue.clone(), LogSink).run());

        let evaluator = Evaluator::new(rules.clone(), cache, queue.clone());
        let engine = AlertEngine::new(evaluator, tick_interval);

        tracing::info!(
            rules = rules.len(),
            active = rules.active_rules().count(),
            seeded_prices = config.prices.len(),
            capacity = queue.capacity(),
            policy = ?queue.policy(),
            "Starting alert engine"
        );

        engine.run_until(shutdown_signal()).await;

        let grace = config.engine.grace_period();
        if let Some(stats) = await_with_grace(consumer, grace).await {
            tracing::debug!(delivered = stats.delivered, "Consumer finished");
        }

        let stats = queue.stats();
        tracing::info!(
            pushed = stats.pushed,
            dropped = stats.dropped,
            evicted = stats.evicted,
            received = stats.received,
            "Alert engine exited"
        );
        Ok(())
    }
}

/// Build a cache holding the seed prices, pumped to completion
async fn seed_cache(prices: &[SeedPrice]) -> anyhow::Result<PriceCache> {
    let cache = PriceCache::new();
    let seeds = StaticFeed::from_config(prices);
    let applied = feed::pump(seeds.subscribe().await?, cache.clone()).await;
    tracing::debug!(applied, "Seed prices loaded");
    Ok(cache)
}

/// Completes on Ctrl-C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT (Ctrl+C)"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
