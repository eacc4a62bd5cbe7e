//! Batch ranking report
//!
//! Renders as one line per ranked symbol, followed by a skipped summary
//! when anything was skipped:
//!
//! ```text
//! GOOD 42.00% (1Y: +3.00%)
//! FLAT 8.90% (1Y: N/A)
//! Skipped (2): BAD1, BAD2
//! ```

use crate::momentum::MomentumError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A symbol that produced a momentum price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSymbol {
    pub symbol: String,
    /// Full-precision momentum price
    pub momentum_price: Decimal,
    /// Last close of the series the momentum was computed from
    pub actual_price: Decimal,
    /// `momentum_price / actual_price * 100`
    pub percentage: Decimal,
    /// Trailing 1-year price change in percent, when enough history exists
    pub year_change_pct: Option<Decimal>,
}

/// A symbol dropped from the ranking, with the reason
#[derive(Debug)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: MomentumError,
}

/// Outcome of evaluating one symbol
#[derive(Debug)]
pub enum SymbolResult {
    Ranked(RankedSymbol),
    Skipped(SkippedSymbol),
}

/// Ranked symbols (percentage descending) and skipped symbols (lexical)
#[derive(Debug, Default)]
pub struct BatchReport {
    ranked: Vec<RankedSymbol>,
    skipped: Vec<SkippedSymbol>,
}

impl BatchReport {
    /// Partition and sort results given in encounter order
    ///
    /// Equal percentages keep their encounter order.
    pub fn from_results(results: impl IntoIterator<Item = SymbolResult>) -> Self {
        let mut report = Self::default();
        for result in results {
            match result {
                SymbolResult::Ranked(r) => report.ranked.push(r),
                SymbolResult::Skipped(s) => report.skipped.push(s),
            }
        }

        report.ranked.sort_by(|a, b| b.percentage.cmp(&a.percentage));
        report.skipped.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        report
    }

    pub fn ranked(&self) -> &[RankedSymbol] {
        &self.ranked
    }

    pub fn skipped(&self) -> &[SkippedSymbol] {
        &self.skipped
    }

    /// Bare names of skipped symbols, sorted
    pub fn skipped_symbols(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.symbol.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty() && self.skipped.is_empty()
    }
}

/// Two decimals, e.g. "42.00"
fn two_dp(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Two decimals with an explicit sign, e.g. "+3.00" / "-1.25"
fn signed_two_dp(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", two_dp(rounded.abs()))
    } else {
        format!("+{}", two_dp(rounded.abs()))
    }
}

impl fmt::Display for RankedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}%", self.symbol, two_dp(self.percentage))?;
        match self.year_change_pct {
            Some(change) => write!(f, " (1Y: {}%)", signed_two_dp(change)),
            None => write!(f, " (1Y: N/A)"),
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ranked in &self.ranked {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}", ranked)?;
            first = false;
        }

        if !self.skipped.is_empty() {
            if !first {
                writeln!(f)?;
            }
            write!(
                f,
                "Skipped ({}): {}",
                self.skipped.len(),
                self.skipped_symbols().join(", ")
            )?;
        }

        Ok(())
    }
}
