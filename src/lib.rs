//! momentum-price: volume-flow momentum prices for traded securities
//!
//! This library provides the core components for:
//! - Daily OHLCV series and share counts behind a provider trait
//! - The momentum price recurrence over net volume flow
//! - Batch ranking of symbols with bounded concurrency and partial-failure tolerance
//! - Intraday volume-pressure summaries
//! - Logging and metrics

pub mod cli;
pub mod config;
pub mod market;
pub mod momentum;
pub mod ranking;
pub mod telemetry;
