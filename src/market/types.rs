//! Market data types
//!
//! Daily bars, ordered series, and the windows a provider is asked for.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One trading day of OHLCV data (high/low are not needed by the engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Shares traded
    pub volume: Decimal,
}

impl DailyBar {
    /// Create a new bar
    pub fn new(date: NaiveDate, open: Decimal, close: Decimal, volume: Decimal) -> Self {
        Self {
            date,
            open,
            close,
            volume,
        }
    }
}

/// Chronological daily bars for one symbol
///
/// Dates are strictly increasing. Construction sorts the input and keeps
/// the last bar seen for any repeated date.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    bars: Vec<DailyBar>,
}

impl Series {
    /// Build a series from bars in any order
    pub fn new(symbol: impl Into<String>, mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<DailyBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    /// An empty series for the symbol
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close of the earliest bar
    pub fn first_close(&self) -> Option<Decimal> {
        self.bars.first().map(|b| b.close)
    }

    /// Close of the latest bar
    pub fn last_close(&self) -> Option<Decimal> {
        self.bars.last().map(|b| b.close)
    }

    /// Bars falling inside `lookback`, measured back from the latest bar
    pub fn trailing(&self, lookback: Lookback) -> Series {
        let Some(last) = self.bars.last() else {
            return self.clone();
        };
        let cutoff = last.date - lookback.as_duration();

        Series {
            symbol: self.symbol.clone(),
            bars: self
                .bars
                .iter()
                .filter(|b| b.date > cutoff)
                .cloned()
                .collect(),
        }
    }
}

/// How far back a fetch reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// Calendar days
    Days(u32),
    /// Calendar years (365 days each)
    Years(u32),
}

impl Lookback {
    /// The trailing one-year window used for the 1Y change
    pub const ONE_YEAR: Lookback = Lookback::Years(1);

    /// Range string understood by chart APIs (e.g. "7d", "3y")
    pub fn as_range(&self) -> String {
        match self {
            Lookback::Days(n) => format!("{}d", n),
            Lookback::Years(n) => format!("{}y", n),
        }
    }

    /// Window length in calendar days
    pub fn as_duration(&self) -> Duration {
        match self {
            Lookback::Days(n) => Duration::days(i64::from(*n)),
            Lookback::Years(n) => Duration::days(365 * i64::from(*n)),
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_range())
    }
}

/// Bar sampling interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market data provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider does not know the symbol
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),
    /// Request exceeded the provider's timeout
    #[error("Request timed out")]
    Timeout,
    /// Non-success HTTP status
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Response could not be decoded
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
    /// Provider cannot serve the requested interval
    #[error("Unsupported interval: {0}")]
    UnsupportedInterval(Interval),
    /// Provider is reachable but refused to serve data
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Http(err)
        }
    }
}
