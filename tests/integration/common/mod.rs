//! Shared builders for integration tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use momentum_price::market::DailyBar;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
}

/// Consecutive daily bars with open == close
pub fn bars_from_closes(closes: &[Decimal], volume: Decimal) -> Vec<DailyBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            DailyBar::new(start_date() + Duration::days(i as i64), *close, *close, volume)
        })
        .collect()
}

pub fn flat_bars(days: usize, close: Decimal, volume: Decimal) -> Vec<DailyBar> {
    bars_from_closes(&vec![close; days], volume)
}

/// Bars whose momentum pins to `momentum` while the market ends at `last`;
/// `first` is the oldest close and the base for the 1Y change
pub fn shaped_bars(days: usize, first: Decimal, momentum: Decimal, last: Decimal) -> Vec<DailyBar> {
    let mut bars = flat_bars(days, momentum, dec!(1000));
    bars[0].open = first;
    bars[0].close = first;
    let end = days - 1;
    bars[end].open = last;
    bars[end].close = last;
    bars[end].volume = Decimal::ZERO;
    bars
}
