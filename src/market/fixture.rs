//! In-memory market data provider
//!
//! Serves canned series and share counts, either built in code or loaded
//! from a JSON file of the form:
//!
//! ```json
//! {
//!   "AAPL": {
//!     "shares_outstanding": 15000000000,
//!     "bars": [{ "date": "2024-01-02", "open": 187.15, "close": 185.64, "volume": 82488700 }]
//!   }
//! }
//! ```

use super::{DailyBar, Interval, Lookback, MarketDataProvider, ProviderError, Series};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned data for one symbol
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureEntry {
    /// Daily bars, any order
    #[serde(default)]
    pub bars: Vec<DailyBar>,
    /// Total shares outstanding
    #[serde(default)]
    pub shares_outstanding: Option<Decimal>,
    /// Artificial latency applied to every fetch for this symbol
    #[serde(default)]
    pub delay_ms: u64,
    /// When set, every fetch for this symbol fails with this message
    #[serde(default)]
    pub failure: Option<String>,
}

/// Provider backed by a symbol -> fixture map
#[derive(Default)]
pub struct FixtureProvider {
    entries: HashMap<String, FixtureEntry>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FixtureProvider {
    /// Create an empty provider (every symbol is unknown)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse fixtures from a JSON document
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let entries: HashMap<String, FixtureEntry> = serde_json::from_str(json)?;
        Ok(entries
            .into_iter()
            .fold(Self::new(), |provider, (symbol, entry)| {
                provider.with_entry(symbol, entry)
            }))
    }

    /// Add or replace a symbol's fixture
    pub fn with_entry(mut self, symbol: impl Into<String>, entry: FixtureEntry) -> Self {
        self.entries.insert(symbol.into().to_uppercase(), entry);
        self
    }

    /// Add a symbol with bars and a share count
    pub fn with_symbol(
        self,
        symbol: impl Into<String>,
        bars: Vec<DailyBar>,
        shares_outstanding: Option<Decimal>,
    ) -> Self {
        self.with_entry(
            symbol,
            FixtureEntry {
                bars,
                shares_outstanding,
                ..Default::default()
            },
        )
    }

    /// Make every fetch for `symbol` wait `delay` first
    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        let entry = self.entries.entry(symbol.to_uppercase()).or_default();
        entry.delay_ms = delay.as_millis() as u64;
        self
    }

    /// Make every fetch for `symbol` fail
    pub fn with_failure(mut self, symbol: &str, message: impl Into<String>) -> Self {
        let entry = self.entries.entry(symbol.to_uppercase()).or_default();
        entry.failure = Some(message.into());
        self
    }

    /// Number of symbols with fixtures
    pub fn symbol_count(&self) -> usize {
        self.entries.len()
    }

    /// Highest number of fetches observed running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn lookup(&self, symbol: &str) -> Result<&FixtureEntry, ProviderError> {
        let entry = self
            .entries
            .get(&symbol.to_uppercase())
            .ok_or_else(|| ProviderError::UnknownSymbol(symbol.to_string()))?;

        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);
        if entry.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(entry.delay_ms)).await;
        }

        match &entry.failure {
            Some(message) => Err(ProviderError::Unavailable(message.clone())),
            None => Ok(entry),
        }
    }
}

/// Counts a fetch as in flight until dropped, including when cancelled
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(in_flight: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Series, ProviderError> {
        if interval != Interval::Daily {
            return Err(ProviderError::UnsupportedInterval(interval));
        }

        let entry = self.lookup(symbol).await?;
        let series = Series::new(symbol.to_uppercase(), entry.bars.clone()).trailing(lookback);

        tracing::debug!(
            symbol = %symbol,
            lookback = %lookback,
            bars = series.len(),
            "Served fixture series"
        );

        Ok(series)
    }

    async fn fetch_shares_outstanding(
        &self,
        symbol: &str,
    ) -> Result<Option<Decimal>, ProviderError> {
        Ok(self.lookup(symbol).await?.shares_outstanding)
    }
}
