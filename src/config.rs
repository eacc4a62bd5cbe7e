//! Configuration types for momentum-price

use crate::market::YahooConfig;
use crate::momentum::MIN_USABLE_DAYS;
use crate::ranking::{
    RankingConfig, DEFAULT_CONCURRENCY, DEFAULT_SYMBOL_TIMEOUT, DEFAULT_YEARS, MIN_YEAR_BARS,
};
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Which market data provider to use
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Fixture,
}

/// Market data provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// JSON fixture file (fixture provider only)
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,

    /// Base URL override for the Yahoo query API
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Yahoo,
            fixture_path: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Yahoo client settings derived from this section
    pub fn yahoo(&self) -> YahooConfig {
        let defaults = YahooConfig::default();
        YahooConfig {
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(self.timeout_secs),
            ..defaults
        }
    }
}

/// Momentum engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Minimum days with a defined return
    #[serde(default = "default_min_usable_days")]
    pub min_usable_days: usize,
}

fn default_min_usable_days() -> usize {
    MIN_USABLE_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_usable_days: MIN_USABLE_DAYS,
        }
    }
}

/// Batch ranking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Symbols evaluated concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-symbol time budget (seconds)
    #[serde(default = "default_symbol_timeout_secs")]
    pub symbol_timeout_secs: u64,

    /// Years of history used for the momentum series
    #[serde(default = "default_years")]
    pub default_years: u32,

    /// Bars required in the 1-year window for a 1Y change
    #[serde(default = "default_min_year_bars")]
    pub min_year_bars: usize,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}
fn default_symbol_timeout_secs() -> u64 {
    DEFAULT_SYMBOL_TIMEOUT.as_secs()
}
fn default_years() -> u32 {
    DEFAULT_YEARS
}
fn default_min_year_bars() -> usize {
    MIN_YEAR_BARS
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            symbol_timeout_secs: DEFAULT_SYMBOL_TIMEOUT.as_secs(),
            default_years: DEFAULT_YEARS,
            min_year_bars: MIN_YEAR_BARS,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Ranking settings from the engine and batch sections
    pub fn ranking(&self) -> RankingConfig {
        RankingConfig {
            concurrency: self.batch.concurrency,
            symbol_timeout: Duration::from_secs(self.batch.symbol_timeout_secs),
            min_year_bars: self.batch.min_year_bars,
            min_usable_days: self.engine.min_usable_days,
        }
    }
}
