//! Flow command implementation

use super::build_provider;
use crate::config::Config;
use crate::market::{Interval, MarketDataProvider};
use crate::momentum::flow::{render_pressure, PressurePeriod};
use crate::ranking::normalize_symbol;
use clap::Args;

#[derive(Args, Debug)]
pub struct FlowArgs {
    /// Ticker symbol
    pub symbol: String,

    /// Window to summarize
    #[arg(long, value_enum, default_value_t = PressurePeriod::Today)]
    pub period: PressurePeriod,
}

impl FlowArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let provider = build_provider(config)?;
        let symbol = normalize_symbol(&self.symbol);

        let series = match provider
            .fetch_series(&symbol, self.period.lookback(), Interval::Daily)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                println!("Error fetching volume for {}: {}", symbol, e);
                return Ok(());
            }
        };

        if series.is_empty() {
            println!("Could not find volume data for symbol: {}", symbol);
        } else {
            println!("{}", render_pressure(&series, self.period));
        }
        Ok(())
    }
}
