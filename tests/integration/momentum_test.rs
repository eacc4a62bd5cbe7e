//! Integration tests for the momentum engine

mod common;

use common::{bars_from_closes, flat_bars};
use momentum_price::market::{FixtureProvider, Series};
use momentum_price::momentum::{
    compute_momentum_price, momentum_for_symbol, MomentumEngine, MomentumError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_eleven_flat_days_pin_to_first_usable_close() {
    let series = Series::new("FLAT", flat_bars(11, dec!(50.00), dec!(31337)));
    let price = compute_momentum_price(&series, Some(dec!(1000))).unwrap();
    assert_eq!(price, dec!(50.00));
}

#[test]
fn test_usable_day_boundary() {
    let nine = Series::new("B", flat_bars(10, dec!(20), dec!(10)));
    let ten = Series::new("B", flat_bars(11, dec!(20), dec!(10)));

    assert!(matches!(
        compute_momentum_price(&nine, Some(dec!(5))),
        Err(MomentumError::InsufficientData { usable_days: 9, .. })
    ));
    assert_eq!(compute_momentum_price(&ten, Some(dec!(5))).unwrap(), dec!(20));
}

#[test]
fn test_buying_pressure_lifts_momentum_above_start() {
    // Steady 1% daily gains on heavy volume
    let mut closes = vec![dec!(100)];
    for _ in 0..30 {
        let last = *closes.last().unwrap();
        closes.push((last * dec!(1.01)).round_dp(4));
    }
    let series = Series::new("UP", bars_from_closes(&closes, dec!(50000)));

    let run = MomentumEngine::with_defaults()
        .run(&series, Some(dec!(1000000)))
        .unwrap();
    assert!(run.momentum_price > run.first_close);
    // Flow is a fraction of shares outstanding, so momentum lags the market
    assert!(run.momentum_price < run.last_close);
}

#[test]
fn test_selling_pressure_drags_momentum_below_start() {
    let mut closes = vec![dec!(100)];
    for _ in 0..30 {
        let last = *closes.last().unwrap();
        closes.push((last * dec!(0.98)).round_dp(4));
    }
    let series = Series::new("DOWN", bars_from_closes(&closes, dec!(50000)));

    let run = MomentumEngine::with_defaults()
        .run(&series, Some(dec!(1000000)))
        .unwrap();
    assert!(run.momentum_price < run.first_close);
}

#[test]
fn test_scale_invariance_across_magnitudes() {
    let closes: Vec<Decimal> = (0..60)
        .map(|i| dec!(75) + Decimal::from((i * 13) % 17) / dec!(4))
        .collect();

    let price_at = |scale: Decimal| {
        let series = Series::new("S", bars_from_closes(&closes, dec!(3000) * scale));
        compute_momentum_price(&series, Some(dec!(200000) * scale)).unwrap()
    };

    assert_eq!(price_at(dec!(1)), price_at(dec!(1000)));
    assert_eq!(price_at(dec!(1)), price_at(dec!(0.5)));
}

#[tokio::test]
async fn test_single_symbol_error_is_descriptive() {
    let provider =
        FixtureProvider::new().with_symbol("THIN", flat_bars(5, dec!(1), dec!(1)), Some(dec!(1)));

    let err = momentum_for_symbol(&provider, &MomentumEngine::with_defaults(), "THIN", 3)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Insufficient data for THIN: 4 usable days, need 10"
    );
}
