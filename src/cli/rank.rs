//! Rank command implementation

use super::build_provider;
use crate::config::Config;
use crate::ranking::RankingOrchestrator;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RankArgs {
    /// Comma-separated symbols (e.g. "AAPL,MSFT,GOOGL")
    pub symbols: String,

    /// Years of daily history to use
    #[arg(long)]
    pub years: Option<u32>,

    /// Symbols evaluated concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-symbol timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl RankArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let provider = build_provider(config)?;

        let mut ranking = config.ranking();
        if let Some(concurrency) = self.concurrency {
            ranking.concurrency = concurrency;
        }
        if let Some(secs) = self.timeout_secs {
            ranking.symbol_timeout = Duration::from_secs(secs);
        }
        let years = self.years.unwrap_or(config.batch.default_years);

        let orchestrator = RankingOrchestrator::new(provider, ranking);
        let report = orchestrator.rank_list(&self.symbols, years).await?;

        println!("{}", report);
        Ok(())
    }
}
