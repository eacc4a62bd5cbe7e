//! CLI interface for momentum-price
//!
//! Provides subcommands for:
//! - `price`: Momentum price for one symbol
//! - `rank`: Rank a list of symbols by momentum as % of actual price
//! - `flow`: Intraday volume pressure for one symbol
//! - `config`: Show effective configuration

mod flow;
mod price;
mod rank;

pub use flow::FlowArgs;
pub use price::PriceArgs;
pub use rank::RankArgs;

use crate::config::{Config, ProviderKind};
use crate::market::{FixtureProvider, MarketDataProvider, YahooProvider};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "momentum-price")]
#[command(about = "Volume-flow momentum prices for traded securities")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Momentum price for a single symbol
    Price(PriceArgs),
    /// Rank symbols by momentum price as a percentage of actual price
    Rank(RankArgs),
    /// Net volume pressure for a symbol
    Flow(FlowArgs),
    /// Show configuration
    Config,
}

/// Build the provider selected in configuration
pub fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn MarketDataProvider>> {
    match config.provider.kind {
        ProviderKind::Yahoo => {
            let provider = YahooProvider::with_config(config.provider.yahoo())
                .context("Failed to create Yahoo provider")?;
            Ok(Arc::new(provider))
        }
        ProviderKind::Fixture => {
            let path = config
                .provider
                .fixture_path
                .as_ref()
                .context("provider.fixture_path is required for the fixture provider")?;
            let provider = FixtureProvider::load(path)
                .with_context(|| format!("Failed to load fixtures from {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                symbols = provider.symbol_count(),
                "Loaded fixture provider"
            );
            Ok(Arc::new(provider))
        }
    }
}
