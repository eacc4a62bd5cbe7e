//! Price command implementation

use super::build_provider;
use crate::config::Config;
use crate::momentum::{momentum_for_symbol, MomentumEngine};
use crate::ranking::normalize_symbol;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Ticker symbol (e.g. AAPL, CBA.AX)
    pub symbol: String,

    /// Years of daily history to use
    #[arg(long)]
    pub years: Option<u32>,
}

impl PriceArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let provider = build_provider(config)?;
        let engine = MomentumEngine::new(config.engine.min_usable_days);
        let symbol = normalize_symbol(&self.symbol);
        let years = self.years.unwrap_or(config.batch.default_years).max(1);

        tracing::info!(symbol = %symbol, years, "Computing momentum price");

        match momentum_for_symbol(provider.as_ref(), &engine, &symbol, years).await {
            Ok(quote) => {
                let percentage = quote
                    .momentum_price
                    .checked_div(quote.actual_price)
                    .map(|ratio| format!("{:.2}%", (ratio * Decimal::ONE_HUNDRED).round_dp(2)))
                    .unwrap_or_else(|| "N/A".to_string());
                println!(
                    "{} momentum ${:.2} vs actual ${:.2} ({}) over {} days",
                    quote.symbol,
                    quote.momentum_price,
                    quote.actual_price.round_dp(2),
                    percentage,
                    quote.usable_days
                );
            }
            Err(e) => println!("{}", e),
        }

        Ok(())
    }
}
