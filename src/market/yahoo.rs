//! Yahoo Finance market data provider
//!
//! Daily bars come from the v8 chart endpoint. Shares outstanding come from
//! the quoteSummary `defaultKeyStatistics` module, which requires a
//! cookie + crumb handshake; the crumb is cached for the provider's lifetime
//! and refreshed once when Yahoo answers 401.

use super::{DailyBar, Interval, Lookback, MarketDataProvider, ProviderError, Series};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Yahoo Finance query API base URL
pub const YAHOO_QUERY_URL: &str = "https://query1.finance.yahoo.com";

/// URL that hands out the session cookie needed for a crumb
const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) momentum-price";

/// Configuration for the Yahoo provider
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Base URL for chart and quoteSummary requests
    pub base_url: String,
    /// URL fetched to obtain the session cookie
    pub cookie_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: YAHOO_QUERY_URL.to_string(),
            cookie_url: YAHOO_COOKIE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Provider backed by Yahoo Finance
pub struct YahooProvider {
    config: YahooConfig,
    client: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    /// Create a provider with default configuration
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(YahooConfig::default())
    }

    /// Create a provider with custom configuration
    pub fn with_config(config: YahooConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            config,
            client,
            crumb: Mutex::new(None),
        })
    }

    /// Return the cached crumb, fetching cookie and crumb if absent
    async fn crumb(&self) -> Result<String, ProviderError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie endpoint usually answers 404; only the Set-Cookie matters
        let _ = self.client.get(&self.config.cookie_url).send().await?;

        let url = format!("{}/v1/test/getcrumb", self.config.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "crumb request failed with status {}",
                response.status()
            )));
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(ProviderError::Unavailable(
                "Yahoo returned an invalid crumb".to_string(),
            ));
        }

        tracing::debug!("Obtained Yahoo crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    /// `base_url` joined with `path` and the symbol as one encoded segment
    fn symbol_url(&self, path: &[&str], symbol: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ProviderError::Parse(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Parse("base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(path)
            .push(symbol);
        Ok(url)
    }

    async fn get_text(
        &self,
        url: Url,
        symbol: &str,
        query: &[(&str, String)],
    ) -> Result<String, ProviderError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::UnknownSymbol(symbol.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.text().await?)
    }

    async fn fetch_quote_summary(&self, symbol: &str) -> Result<String, ProviderError> {
        let url = self.symbol_url(&["v10", "finance", "quoteSummary"], symbol)?;

        let crumb = self.crumb().await?;
        let query = [
            ("modules", "defaultKeyStatistics".to_string()),
            ("crumb", crumb),
        ];
        match self.get_text(url.clone(), symbol, &query).await {
            Err(ProviderError::Status { status: 401, .. }) => {
                tracing::debug!(symbol = %symbol, "Yahoo crumb rejected, refreshing");
                self.invalidate_crumb().await;
                let query = [
                    ("modules", "defaultKeyStatistics".to_string()),
                    ("crumb", self.crumb().await?),
                ];
                self.get_text(url, symbol, &query).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Series, ProviderError> {
        let url = self.symbol_url(&["v8", "finance", "chart"], symbol)?;
        let query = [
            ("range", lookback.as_range()),
            ("interval", interval.as_str().to_string()),
        ];

        tracing::debug!(url = %url, lookback = %lookback, interval = %interval, "Fetching chart");

        let started = Instant::now();
        let body = self.get_text(url, symbol, &query).await?;
        let series = parse_chart(symbol, &body)?;

        tracing::debug!(
            symbol = %symbol,
            bars = series.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched chart"
        );

        Ok(series)
    }

    async fn fetch_shares_outstanding(
        &self,
        symbol: &str,
    ) -> Result<Option<Decimal>, ProviderError> {
        let body = self.fetch_quote_summary(symbol).await?;
        parse_shares_outstanding(symbol, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryEnvelope {
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    #[serde(default)]
    shares_outstanding: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn api_error(symbol: &str, error: YahooApiError) -> ProviderError {
    if error.code.eq_ignore_ascii_case("Not Found") {
        ProviderError::UnknownSymbol(symbol.to_string())
    } else {
        ProviderError::Unavailable(format!("{}: {}", error.code, error.description))
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok().map(|d| d.round_dp(6))
}

/// Decode a chart response, keeping only rows with open, close and volume
fn parse_chart(symbol: &str, body: &str) -> Result<Series, ProviderError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if let Some(error) = envelope.chart.error {
        return Err(api_error(symbol, error));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Series::empty(symbol));
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let fields = (
            quote.open.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );
        let (Some(open), Some(close), Some(volume)) = fields else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        if let (Some(open), Some(close), Some(volume)) =
            (to_decimal(open), to_decimal(close), to_decimal(volume))
        {
            bars.push(DailyBar::new(date, open, close, volume));
        }
    }

    Ok(Series::new(symbol, bars))
}

/// Decode a quoteSummary response into a share count
fn parse_shares_outstanding(symbol: &str, body: &str) -> Result<Option<Decimal>, ProviderError> {
    let envelope: QuoteSummaryEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(api_error(symbol, error));
    }

    Ok(envelope
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.default_key_statistics)
        .and_then(|s| s.shares_outstanding)
        .and_then(|v| v.raw)
        .and_then(to_decimal))
}
