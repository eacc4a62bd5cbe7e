//! Prometheus metrics

use std::time::Duration;

/// Provider call types
#[derive(Debug, Clone, Copy)]
pub enum FetchKind {
    /// Multi-year daily series for the engine
    Series,
    /// Share count lookup
    SharesOutstanding,
    /// Independent 1-year series for the 1Y change
    YearSeries,
}

impl FetchKind {
    fn label(&self) -> &'static str {
        match self {
            FetchKind::Series => "series",
            FetchKind::SharesOutstanding => "shares_outstanding",
            FetchKind::YearSeries => "year_series",
        }
    }
}

/// Record how long a provider call took
pub fn record_fetch(kind: FetchKind, duration: Duration) {
    ::metrics::histogram!("momentum_provider_fetch_seconds", "call" => kind.label())
        .record(duration.as_secs_f64());
}

/// Count a symbol as ranked (`None`) or skipped for the given reason
pub fn record_outcome(skip_reason: Option<&'static str>) {
    match skip_reason {
        None => ::metrics::counter!("momentum_symbols_ranked_total").increment(1),
        Some(reason) => {
            ::metrics::counter!("momentum_symbols_skipped_total", "reason" => reason).increment(1)
        }
    }
}

/// Start the Prometheus exporter on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(port, "Prometheus exporter listening");
    Ok(())
}
