//! Single-symbol momentum quote

use super::engine::MomentumEngine;
use super::types::{MomentumError, MomentumQuote};
use crate::market::{Interval, Lookback, MarketDataProvider};

/// Fetch `years` of daily bars and the share count for `symbol`, then run
/// the engine. Failures come back as a descriptive [`MomentumError`].
pub async fn momentum_for_symbol<P>(
    provider: &P,
    engine: &MomentumEngine,
    symbol: &str,
    years: u32,
) -> Result<MomentumQuote, MomentumError>
where
    P: MarketDataProvider + ?Sized,
{
    let series = provider
        .fetch_series(symbol, Lookback::Years(years), Interval::Daily)
        .await
        .map_err(|e| MomentumError::provider(symbol, e))?;

    // Skip the share lookup when there is nothing to price
    if series.is_empty() {
        return Err(MomentumError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let shares = provider
        .fetch_shares_outstanding(symbol)
        .await
        .map_err(|e| MomentumError::provider(symbol, e))?;

    let run = engine.run(&series, shares)?;

    Ok(MomentumQuote {
        symbol: symbol.to_string(),
        momentum_price: run.momentum_price.round_dp(2),
        actual_price: run.last_close,
        usable_days: run.usable_days,
    })
}
