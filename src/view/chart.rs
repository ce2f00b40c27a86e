use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use crate::telemetry;

pub const DEFAULT_CHART_SYMBOL: &str = "BTCUSD";

const WIDGET_SCRIPT: &str = "https://s3.tradingview.com/tv.js";
const WIDGET_EMBED: &str = "https://s.tradingview.com/widgetembed/";
const EXCHANGE: &str = "BINANCE";

/// Settings of the embedded TradingView chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartConfig {
    pub symbol: String,
    pub interval: &'static str,
    pub timezone: &'static str,
    pub theme: &'static str,
    pub style: &'static str,
    pub locale: &'static str,
    pub toolbar_bg: &'static str,
    pub allow_symbol_change: bool,
}

impl ChartConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: "D",
            timezone: "Etc/UTC",
            theme: "light",
            style: "1",
            locale: "en",
            toolbar_bg: "#f1f3f6",
            allow_symbol_change: true,
        }
    }

    /// Fully qualified symbol, e.g. `BINANCE:BTCUSD`.
    pub fn qualified_symbol(&self) -> String {
        format!("{EXCHANGE}:{}", self.symbol)
    }

    pub fn embed_url(&self) -> String {
        let params = [
            ("symbol", self.qualified_symbol()),
            ("interval", self.interval.to_string()),
            ("timezone", self.timezone.to_string()),
            ("theme", self.theme.to_string()),
            ("style", self.style.to_string()),
            ("locale", self.locale.to_string()),
            ("toolbarbg", self.toolbar_bg.trim_start_matches('#').to_string()),
            ("allow_symbol_change", u8::from(self.allow_symbol_change).to_string()),
        ];

        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{WIDGET_EMBED}?{query}")
    }
}

/// Tracks how many chart widgets are currently mounted.
#[derive(Clone, Debug, Default)]
pub struct ChartRegistry {
    mounted: Arc<AtomicUsize>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the widget resources. They are released when the returned
    /// handle is dropped.
    pub fn mount(&self, config: ChartConfig) -> ChartHandle {
        let now = self.mounted.fetch_add(1, Ordering::AcqRel) + 1;
        telemetry::record_chart_mounted();
        debug!(symbol = %config.qualified_symbol(), script = WIDGET_SCRIPT, mounted = now, "chart widget mounted");

        ChartHandle {
            config,
            mounted: self.mounted.clone(),
        }
    }

    pub fn mounted(&self) -> usize {
        self.mounted.load(Ordering::Acquire)
    }
}

/// A mounted chart widget.
#[derive(Debug)]
pub struct ChartHandle {
    config: ChartConfig,
    mounted: Arc<AtomicUsize>,
}

impl ChartHandle {
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        let left = self.mounted.fetch_sub(1, Ordering::AcqRel) - 1;
        telemetry::record_chart_released();
        debug!(symbol = %self.config.qualified_symbol(), mounted = left, "chart widget released");
    }
}
