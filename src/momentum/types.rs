//! Momentum engine types
//!
//! Error taxonomy, the running accumulator, and engine outputs.

use crate::market::ProviderError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Why a momentum price could not be produced for a symbol
#[derive(Debug, Error)]
pub enum MomentumError {
    /// Provider returned an empty series
    #[error("Could not find data for symbol: {symbol}")]
    NoData { symbol: String },
    /// Share count absent, zero, or negative
    #[error("Could not find shares outstanding for {symbol}")]
    MissingShareCount { symbol: String },
    /// Too few days with a defined return
    #[error("Insufficient data for {symbol}: {usable_days} usable days, need {required}")]
    InsufficientData {
        symbol: String,
        usable_days: usize,
        required: usize,
    },
    /// Provider lookup or transport failure
    #[error("Provider error for {symbol}: {source}")]
    Provider {
        symbol: String,
        #[source]
        source: ProviderError,
    },
    /// Provider did not answer within the per-symbol budget
    #[error("Timed out after {timeout:?} fetching {symbol}")]
    Timeout { symbol: String, timeout: Duration },
    /// A price the computation divides by was zero, or a value overflowed
    #[error("Arithmetic error computing momentum for {symbol}")]
    Arithmetic { symbol: String },
}

impl MomentumError {
    /// Symbol the error refers to
    pub fn symbol(&self) -> &str {
        match self {
            MomentumError::NoData { symbol }
            | MomentumError::MissingShareCount { symbol }
            | MomentumError::InsufficientData { symbol, .. }
            | MomentumError::Provider { symbol, .. }
            | MomentumError::Timeout { symbol, .. }
            | MomentumError::Arithmetic { symbol } => symbol,
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            MomentumError::NoData { .. } => "no_data",
            MomentumError::MissingShareCount { .. } => "missing_share_count",
            MomentumError::InsufficientData { .. } => "insufficient_data",
            MomentumError::Provider { .. } => "provider",
            MomentumError::Timeout { .. } => "timeout",
            MomentumError::Arithmetic { .. } => "arithmetic",
        }
    }

    pub(crate) fn provider(symbol: &str, source: ProviderError) -> Self {
        MomentumError::Provider {
            symbol: symbol.to_string(),
            source,
        }
    }
}

/// Running accumulator for one recurrence run
///
/// `price() == pool_value / shares_outstanding` after every update.
#[derive(Debug, Clone, Copy)]
pub struct MomentumState {
    pool_value: Decimal,
    shares_outstanding: Decimal,
}

impl MomentumState {
    /// Pin the pool to `close * shares`; `None` if shares is not positive
    pub fn new(close: Decimal, shares_outstanding: Decimal) -> Option<Self> {
        if shares_outstanding <= Decimal::ZERO {
            return None;
        }
        Some(Self {
            pool_value: close.checked_mul(shares_outstanding)?,
            shares_outstanding,
        })
    }

    /// Total notional value in the pool
    pub fn pool_value(&self) -> Decimal {
        self.pool_value
    }

    /// Current momentum price
    pub fn price(&self) -> Decimal {
        self.pool_value / self.shares_outstanding
    }

    /// Price one day's net volume flow at the running momentum price and
    /// add it to the pool. `None` on overflow.
    pub fn apply(&mut self, net_volume_flow: Decimal) -> Option<Decimal> {
        let net_cash_flow = net_volume_flow.checked_mul(self.price())?;
        self.pool_value = self.pool_value.checked_add(net_cash_flow)?;
        Some(self.price())
    }
}

/// Full-precision result of one engine run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumRun {
    /// Final momentum price, unrounded
    pub momentum_price: Decimal,
    /// Close of the first usable day (the pinned starting price)
    pub first_close: Decimal,
    /// Close of the last bar in the series
    pub last_close: Decimal,
    /// Days with a defined daily return
    pub usable_days: usize,
}

/// Momentum price for a single symbol, as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumQuote {
    pub symbol: String,
    /// Momentum price rounded to 2 dp
    pub momentum_price: Decimal,
    /// Last close of the series the momentum was computed from
    pub actual_price: Decimal,
    pub usable_days: usize,
}
