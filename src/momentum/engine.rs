//! Momentum price recurrence
//!
//! Each usable day contributes a net volume flow `volume * daily_return`.
//! Starting from a pool pinned to the first usable close times shares
//! outstanding, every later day's flow is priced at the *running* momentum
//! price (not the market close) and added to the pool:
//!
//! ```text
//! pool      = close[0] * shares
//! price     = pool / shares
//! for each later day i:
//!     pool  += flow[i] * price
//!     price  = pool / shares
//! ```
//!
//! The loop is strictly sequential: each day depends on the previous price.

use super::types::{MomentumError, MomentumRun, MomentumState};
use crate::market::Series;
use rust_decimal::Decimal;

/// Minimum number of days with a defined return
pub const MIN_USABLE_DAYS: usize = 10;

/// Close-to-close return; a non-positive previous close counts as flat
///
/// `None` when the ratio overflows `Decimal`.
pub fn daily_return(prev_close: Decimal, close: Decimal) -> Option<Decimal> {
    if prev_close <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    close.checked_div(prev_close)?.checked_sub(Decimal::ONE)
}

/// A usable day: its close and its net volume flow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowDay {
    pub close: Decimal,
    pub net_volume_flow: Decimal,
}

/// Net volume flow for every bar after the first
///
/// The first bar has no defined return and is dropped. `None` if any
/// flow overflows.
pub fn net_volume_flows(series: &Series) -> Option<Vec<FlowDay>> {
    series
        .bars()
        .windows(2)
        .map(|pair| {
            let ret = daily_return(pair[0].close, pair[1].close)?;
            Some(FlowDay {
                close: pair[1].close,
                net_volume_flow: pair[1].volume.checked_mul(ret)?,
            })
        })
        .collect()
}

/// Runs the momentum recurrence over a series
#[derive(Debug, Clone)]
pub struct MomentumEngine {
    min_usable_days: usize,
}

impl Default for MomentumEngine {
    fn default() -> Self {
        Self {
            min_usable_days: MIN_USABLE_DAYS,
        }
    }
}

impl MomentumEngine {
    /// Create an engine requiring at least `min_usable_days` return days
    pub fn new(min_usable_days: usize) -> Self {
        Self {
            min_usable_days: min_usable_days.max(1),
        }
    }

    /// Create an engine with default configuration
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn min_usable_days(&self) -> usize {
        self.min_usable_days
    }

    /// Run the recurrence and keep full precision
    pub fn run(
        &self,
        series: &Series,
        shares_outstanding: Option<Decimal>,
    ) -> Result<MomentumRun, MomentumError> {
        let symbol = series.symbol();

        if series.is_empty() {
            return Err(MomentumError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let shares = match shares_outstanding {
            Some(shares) if shares > Decimal::ZERO => shares,
            _ => {
                return Err(MomentumError::MissingShareCount {
                    symbol: symbol.to_string(),
                })
            }
        };

        let usable_days = series.len().saturating_sub(1);
        if usable_days < self.min_usable_days {
            return Err(MomentumError::InsufficientData {
                symbol: symbol.to_string(),
                usable_days,
                required: self.min_usable_days,
            });
        }

        let arithmetic = || MomentumError::Arithmetic {
            symbol: symbol.to_string(),
        };

        let flows = net_volume_flows(series).ok_or_else(arithmetic)?;

        let first_close = flows[0].close;
        let mut state = MomentumState::new(first_close, shares).ok_or_else(arithmetic)?;
        for day in &flows[1..] {
            state.apply(day.net_volume_flow).ok_or_else(arithmetic)?;
        }

        let run = MomentumRun {
            momentum_price: state.price(),
            first_close,
            last_close: flows[flows.len() - 1].close,
            usable_days: flows.len(),
        };

        tracing::debug!(
            symbol = %symbol,
            usable_days = run.usable_days,
            first_close = %run.first_close,
            momentum_price = %run.momentum_price,
            "Momentum recurrence complete"
        );

        Ok(run)
    }

    /// Momentum price rounded to 2 dp
    pub fn momentum_price(
        &self,
        series: &Series,
        shares_outstanding: Option<Decimal>,
    ) -> Result<Decimal, MomentumError> {
        self.run(series, shares_outstanding)
            .map(|run| run.momentum_price.round_dp(2))
    }
}

/// Momentum price for a series with the default engine
pub fn compute_momentum_price(
    series: &Series,
    shares_outstanding: Option<Decimal>,
) -> Result<Decimal, MomentumError> {
    MomentumEngine::with_defaults().momentum_price(series, shares_outstanding)
}
