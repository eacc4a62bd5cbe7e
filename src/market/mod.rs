//! Market data module
//!
//! Daily OHLCV series and share counts for a symbol, behind a provider
//! trait so the momentum core never talks to the network directly.

mod fixture;
mod types;
mod yahoo;

pub use fixture::{FixtureEntry, FixtureProvider};
pub use types::{DailyBar, Interval, Lookback, ProviderError, Series};
pub use yahoo::{YahooConfig, YahooProvider, YAHOO_QUERY_URL};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for market data provider implementations
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the bars for `symbol` covering `lookback`, sampled at `interval`
    async fn fetch_series(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Series, ProviderError>;

    /// Fetch total shares outstanding; `None` when the provider has no figure
    async fn fetch_shares_outstanding(&self, symbol: &str)
        -> Result<Option<Decimal>, ProviderError>;
}
