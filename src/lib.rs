//! price-alert: threshold alerts over a shared in-memory price table
//!
//! This library provides:
//! - A concurrent price cache fed by upstream price feeds
//! - Validated, immutable alert rule sets
//! - A periodic evaluator that turns threshold crossings into alerts
//! - A bounded alert queue with an explicit overflow policy
//! - Alert consumers behind a pluggable sink
//! - An engine lifecycle with idempotent, cooperative shutdown

pub mod cache;
pub mod cli;
pub mod config;
pub mod consumer;
pub mod engine;
pub mod evaluator;
pub mod feed;
pub mod queue;
pub mod rules;
pub mod telemetry;
