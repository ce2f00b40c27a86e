use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response of `/simple/price?ids=bitcoin&vs_currencies=inr,usd&include_24hr_change=true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub bitcoin: BitcoinQuote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitcoinQuote {
    pub usd: f64,
    pub usd_24h_change: f64,
    pub inr: f64,
    /// Fetched alongside the USD change but never displayed.
    pub inr_24h_change: f64,
}

/// Envelope returned by `/search/trending`. Only `coins` is consumed;
/// the provider also ships nfts/categories which are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingResponse {
    pub coins: Vec<TrendingCoin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub item: TrendingItem,
}

/// A trending coin as CoinGecko ships it. Fields the provider is known to
/// null out for freshly listed coins are optional so one odd entry cannot
/// fail the whole cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingItem {
    pub id: String,
    pub coin_id: u64,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub thumb: String,
    pub small: String,
    pub large: String,
    pub slug: String,
    pub price_btc: f64,
    pub score: u32,
    pub sparkline: Option<String>,
    pub data: Option<TrendingData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingData {
    pub price: Option<serde_json::Value>,
    pub price_change_percentage_24h: Option<HashMap<String, f64>>,
}

impl TrendingItem {
    /// 24h change in `currency`, if the provider reported one.
    pub fn change_24h(&self, currency: &str) -> Option<f64> {
        self.data
            .as_ref()?
            .price_change_percentage_24h
            .as_ref()?
            .get(currency)
            .copied()
    }
}
