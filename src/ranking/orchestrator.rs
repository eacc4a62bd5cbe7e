//! Batch ranking orchestrator
//!
//! Evaluates many symbols with bounded concurrency. Each symbol's pipeline
//! (fetch series, fetch share count, run the engine, fetch the 1-year
//! window) runs under its own timeout, and any failure downgrades that
//! symbol to a skipped entry without affecting the rest. Sorting happens
//! only after every result is collected.

use super::report::{BatchReport, RankedSymbol, SkippedSymbol, SymbolResult};
use super::symbols::parse_symbol_list;
use super::RankError;
use crate::market::{Interval, Lookback, MarketDataProvider};
use crate::momentum::{MomentumEngine, MomentumError, MIN_USABLE_DAYS};
use crate::telemetry::{record_fetch, record_outcome, FetchKind};
use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of symbols evaluated at once
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default per-symbol time budget
pub const DEFAULT_SYMBOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default lookback for the momentum series
pub const DEFAULT_YEARS: u32 = 3;

/// Bars needed in the 1-year window before a 1Y change is reported
pub const MIN_YEAR_BARS: usize = 50;

/// Configuration for batch ranking
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Maximum symbols evaluated concurrently
    pub concurrency: usize,
    /// Budget for one symbol's whole pipeline
    pub symbol_timeout: Duration,
    /// Minimum bars in the 1-year window for a 1Y change
    pub min_year_bars: usize,
    /// Minimum usable return days for the engine
    pub min_usable_days: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            symbol_timeout: DEFAULT_SYMBOL_TIMEOUT,
            min_year_bars: MIN_YEAR_BARS,
            min_usable_days: MIN_USABLE_DAYS,
        }
    }
}

/// Fans the momentum engine out over a list of symbols
pub struct RankingOrchestrator<P: MarketDataProvider + ?Sized> {
    provider: Arc<P>,
    engine: MomentumEngine,
    config: RankingConfig,
}

impl<P: MarketDataProvider + ?Sized> RankingOrchestrator<P> {
    /// Create a new orchestrator
    pub fn new(provider: Arc<P>, config: RankingConfig) -> Self {
        Self {
            provider,
            engine: MomentumEngine::new(config.min_usable_days),
            config,
        }
    }

    /// Create with default config
    pub fn with_defaults(provider: Arc<P>) -> Self {
        Self::new(provider, RankingConfig::default())
    }

    /// Parse a comma-separated symbol list and rank it
    ///
    /// Only malformed input fails; per-symbol problems become skips.
    pub async fn rank_list(&self, symbols: &str, years: u32) -> Result<BatchReport, RankError> {
        let symbols = parse_symbol_list(symbols)?;
        self.rank(&symbols, years).await
    }

    /// Rank already-normalized symbols
    pub async fn rank(&self, symbols: &[String], years: u32) -> Result<BatchReport, RankError> {
        if years == 0 {
            return Err(RankError::InvalidInput(
                "lookback must be at least one year".to_string(),
            ));
        }

        let started = Instant::now();
        tracing::info!(
            symbols = symbols.len(),
            years,
            concurrency = self.config.concurrency,
            "Ranking momentum"
        );

        // `buffered` keeps encounter order, which the stable sort relies on
        let results: Vec<SymbolResult> = stream::iter(symbols.iter().cloned())
            .map(|symbol| self.evaluate(symbol, years))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let report = BatchReport::from_results(results);

        tracing::info!(
            ranked = report.ranked().len(),
            skipped = report.skipped().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ranking complete"
        );

        Ok(report)
    }

    /// Evaluate one symbol; never fails, only skips
    async fn evaluate(&self, symbol: String, years: u32) -> SymbolResult {
        let timeout = self.config.symbol_timeout;
        let outcome = match tokio::time::timeout(timeout, self.evaluate_inner(&symbol, years)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(MomentumError::Timeout {
                symbol: symbol.clone(),
                timeout,
            }),
        };

        match outcome {
            Ok(ranked) => {
                tracing::debug!(
                    symbol = %symbol,
                    percentage = %ranked.percentage.round_dp(2),
                    "Symbol ranked"
                );
                record_outcome(None);
                SymbolResult::Ranked(ranked)
            }
            Err(reason) => {
                tracing::warn!(symbol = %symbol, reason = %reason, "Skipping symbol");
                record_outcome(Some(reason.kind()));
                SymbolResult::Skipped(SkippedSymbol { symbol, reason })
            }
        }
    }

    async fn evaluate_inner(&self, symbol: &str, years: u32) -> Result<RankedSymbol, MomentumError> {
        let series = timed(
            FetchKind::Series,
            self.provider
                .fetch_series(symbol, Lookback::Years(years), Interval::Daily),
        )
        .await
        .map_err(|e| MomentumError::provider(symbol, e))?;

        if series.is_empty() {
            return Err(MomentumError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let shares = timed(
            FetchKind::SharesOutstanding,
            self.provider.fetch_shares_outstanding(symbol),
        )
        .await
        .map_err(|e| MomentumError::provider(symbol, e))?;

        let run = self.engine.run(&series, shares)?;
        let actual_price = run.last_close;

        let percentage = run
            .momentum_price
            .checked_div(actual_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| MomentumError::Arithmetic {
                symbol: symbol.to_string(),
            })?;

        let year_change_pct = self.year_change_pct(symbol, actual_price).await?;

        Ok(RankedSymbol {
            symbol: symbol.to_string(),
            momentum_price: run.momentum_price,
            actual_price,
            percentage,
            year_change_pct,
        })
    }

    /// Percent change from the first close of an independent 1-year fetch
    /// to `actual_price`; `None` when that window is too short
    async fn year_change_pct(
        &self,
        symbol: &str,
        actual_price: Decimal,
    ) -> Result<Option<Decimal>, MomentumError> {
        let year = timed(
            FetchKind::YearSeries,
            self.provider
                .fetch_series(symbol, Lookback::ONE_YEAR, Interval::Daily),
        )
        .await
        .map_err(|e| MomentumError::provider(symbol, e))?;

        if year.len() < self.config.min_year_bars {
            tracing::debug!(
                symbol = %symbol,
                bars = year.len(),
                required = self.config.min_year_bars,
                "Not enough history for 1Y change"
            );
            return Ok(None);
        }

        let Some(year_ago) = year.first_close() else {
            return Ok(None);
        };
        if year_ago.is_zero() {
            return Ok(None);
        }

        actual_price
            .checked_sub(year_ago)
            .and_then(|diff| diff.checked_div(year_ago))
            .and_then(|change| change.checked_mul(Decimal::ONE_HUNDRED))
            .map(Some)
            .ok_or_else(|| MomentumError::Arithmetic {
                symbol: symbol.to_string(),
            })
    }
}

/// Await a provider call and record its latency
async fn timed<T>(kind: FetchKind, fut: impl Future<Output = T>) -> T {
    let started = Instant::now();
    let out = fut.await;
    record_fetch(kind, started.elapsed());
    out
}

/// Rank a comma-separated symbol list with default configuration
pub async fn rank_momentum<P>(
    provider: Arc<P>,
    symbols: &str,
    years: u32,
) -> Result<BatchReport, RankError>
where
    P: MarketDataProvider + ?Sized,
{
    RankingOrchestrator::with_defaults(provider)
        .rank_list(symbols, years)
        .await
}
