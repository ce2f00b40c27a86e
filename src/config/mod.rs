use anyhow::{Context, bail};
use std::time::Duration;

use crate::market_data::adapters::coingecko::DEFAULT_BASE_URL;
use crate::market_data::refresh_worker::DEFAULT_REFRESH_INTERVAL;
use crate::view::chart::DEFAULT_CHART_SYMBOL;
use crate::view::tab::Tab;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_base_url: String,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub chart_symbol: String,
    pub initial_tab: Tab,
    /// Prometheus exporter port; exporter is off when unset.
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_level = get("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let api_base_url = get("COINGECKO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let chart_symbol = get("CHART_SYMBOL").unwrap_or_else(|| DEFAULT_CHART_SYMBOL.to_string());

        let refresh_interval = match get("REFRESH_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("REFRESH_INTERVAL_SECS must be a whole number of seconds, got '{raw}'"))?;
                if secs == 0 {
                    bail!("REFRESH_INTERVAL_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_REFRESH_INTERVAL,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"))?;
                if secs == 0 {
                    bail!("HTTP_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_HTTP_TIMEOUT,
        };

        let initial_tab = match get("DASHBOARD_TAB") {
            Some(raw) => raw.parse::<Tab>()?,
            None => Tab::default(),
        };

        let metrics_port = get("METRICS_PORT")
            .map(|raw| {
                raw.trim()
                    .parse::<u16>()
                    .with_context(|| format!("METRICS_PORT must be a port number, got '{raw}'"))
            })
            .transpose()?;

        Ok(Self {
            log_level,
            api_base_url,
            refresh_interval,
            http_timeout,
            chart_symbol,
            initial_tab,
            metrics_port,
        })
    }
}
