//! Batch momentum ranking
//!
//! Runs the momentum engine over a list of symbols, ranks the survivors by
//! momentum as a percentage of the actual price, and lists the symbols that
//! had to be skipped.

mod orchestrator;
mod report;
mod symbols;

pub use orchestrator::{
    rank_momentum, RankingConfig, RankingOrchestrator, DEFAULT_CONCURRENCY,
    DEFAULT_SYMBOL_TIMEOUT, DEFAULT_YEARS, MIN_YEAR_BARS,
};
pub use report::{BatchReport, RankedSymbol, SkippedSymbol, SymbolResult};
pub use symbols::{normalize_symbol, parse_symbol_list};

use thiserror::Error;

/// Batch-level ranking errors
#[derive(Debug, Error)]
pub enum RankError {
    /// Symbol list or parameters could not be understood
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
