//! Integration tests for batch ranking

mod common;

use common::{flat_bars, shaped_bars};
use momentum_price::market::FixtureProvider;
use momentum_price::ranking::{rank_momentum, RankError, RankingConfig, RankingOrchestrator};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_good_bad_report() {
    let provider = Arc::new(FixtureProvider::new().with_symbol(
        "GOOD",
        shaped_bars(60, dec!(100), dec!(43.26), dec!(103)),
        Some(dec!(1000)),
    ));

    let report = rank_momentum(provider, "GOOD,BAD", 3).await.unwrap();
    assert_eq!(
        report.to_string(),
        "GOOD 42.00% (1Y: +3.00%)\nSkipped (1): BAD"
    );
}

#[tokio::test]
async fn test_missing_symbol_skipped_regardless_of_position() {
    for input in ["GONE,A,B", "A,GONE,B", "A,B,GONE"] {
        let provider = Arc::new(
            FixtureProvider::new()
                .with_symbol("A", flat_bars(30, dec!(10), dec!(100)), Some(dec!(10)))
                .with_symbol("B", flat_bars(30, dec!(20), dec!(100)), Some(dec!(10))),
        );

        let report = rank_momentum(provider, input, 3).await.unwrap();
        assert_eq!(report.ranked().len(), 2, "input {}", input);
        assert_eq!(report.skipped_symbols(), vec!["GONE"], "input {}", input);
    }
}

#[tokio::test]
async fn test_output_sorted_by_percentage() {
    let provider = Arc::new(
        FixtureProvider::new()
            .with_symbol("MID", shaped_bars(60, dec!(50), dec!(50), dec!(100)), Some(dec!(10)))
            .with_symbol("HIGH", shaped_bars(60, dec!(90), dec!(90), dec!(100)), Some(dec!(10)))
            .with_symbol("LOW", shaped_bars(60, dec!(10), dec!(10), dec!(100)), Some(dec!(10))),
    );

    let report = rank_momentum(provider, "LOW,MID,HIGH", 3).await.unwrap();
    let order: Vec<_> = report.ranked().iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(order, vec!["HIGH", "MID", "LOW"]);
    for pair in report.ranked().windows(2) {
        assert!(pair[0].percentage >= pair[1].percentage);
    }
    assert_eq!(
        report.to_string(),
        "HIGH 90.00% (1Y: +11.11%)\nMID 50.00% (1Y: +100.00%)\nLOW 10.00% (1Y: +900.00%)"
    );
}

#[tokio::test]
async fn test_all_symbols_fail_without_error() {
    let provider = Arc::new(
        FixtureProvider::new()
            .with_failure("X", "connection reset")
            .with_symbol("Y", vec![], Some(dec!(1))),
    );

    let report = rank_momentum(provider, "Y,X,Z", 3).await.unwrap();
    assert!(report.ranked().is_empty());
    assert_eq!(report.to_string(), "Skipped (3): X, Y, Z");
}

#[tokio::test]
async fn test_timeout_does_not_stall_batch() {
    let provider = Arc::new(
        FixtureProvider::new()
            .with_symbol("QUICK", flat_bars(30, dec!(10), dec!(100)), Some(dec!(10)))
            .with_symbol("STUCK", flat_bars(30, dec!(10), dec!(100)), Some(dec!(10)))
            .with_delay("STUCK", Duration::from_secs(60)),
    );
    let orchestrator = RankingOrchestrator::new(
        provider,
        RankingConfig {
            symbol_timeout: Duration::from_millis(100),
            ..Default::default()
        },
    );

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.rank_list("STUCK,QUICK", 3),
    )
    .await
    .expect("batch should finish well before the stuck provider")
    .unwrap();

    assert_eq!(report.to_string(), "QUICK 100.00% (1Y: N/A)\nSkipped (1): STUCK");
}

#[tokio::test]
async fn test_stricter_year_threshold() {
    let provider = Arc::new(FixtureProvider::new().with_symbol(
        "GOOD",
        shaped_bars(60, dec!(100), dec!(43.26), dec!(103)),
        Some(dec!(1000)),
    ));
    let orchestrator = RankingOrchestrator::new(
        provider,
        RankingConfig {
            min_year_bars: 200,
            ..Default::default()
        },
    );

    let report = orchestrator.rank_list("GOOD", 3).await.unwrap();
    assert_eq!(report.to_string(), "GOOD 42.00% (1Y: N/A)");
}

#[tokio::test]
async fn test_odd_entries_are_skipped_not_fatal() {
    let provider = Arc::new(FixtureProvider::new().with_symbol(
        "GOOD",
        shaped_bars(60, dec!(100), dec!(43.26), dec!(103)),
        Some(dec!(1000)),
    ));

    let report = rank_momentum(provider, "GOOD, ,m&m.ns,Q#X,", 3)
        .await
        .unwrap();
    assert_eq!(
        report.to_string(),
        "GOOD 42.00% (1Y: +3.00%)\nSkipped (2): M&M.NS, Q#X"
    );
}

#[tokio::test]
async fn test_all_blank_list_is_top_level_error() {
    let provider = Arc::new(FixtureProvider::new());
    let err = rank_momentum(provider, " , ,", 3).await.unwrap_err();
    assert!(matches!(err, RankError::InvalidInput(_)));
}
