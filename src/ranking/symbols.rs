//! Symbol list parsing

use super::RankError;

/// Trim and uppercase a ticker
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Parse a comma-separated symbol list
///
/// Entries are trimmed and uppercased; duplicates and order are preserved.
/// Blank entries (`A,,B`, a trailing comma) are dropped. Anything else is
/// kept as-is and left for the provider to accept or reject, so an unknown
/// ticker is skipped like any other per-symbol failure. Only a list with no
/// symbols at all is invalid.
pub fn parse_symbol_list(input: &str) -> Result<Vec<String>, RankError> {
    let symbols: Vec<String> = input
        .split(',')
        .map(normalize_symbol)
        .filter(|symbol| !symbol.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(RankError::InvalidInput("symbol list is empty".to_string()));
    }
    Ok(symbols)
}
