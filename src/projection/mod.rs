//! Pure derivations from a fetched snapshot to display values.
//!
//! Everything here is synchronous, infallible and deterministic: the same
//! snapshot always projects to the same view.

pub mod format;

use crate::market_data::types::{PriceSnapshot, TrendingCoin};

/// Currency whose 24h change drives the indicators.
const CHANGE_CURRENCY: &str = "usd";

pub fn is_positive(change: f64) -> bool {
    change >= 0.0
}

/// Absolute change with exactly two decimals, e.g. `-2.5` → `"2.50"`.
pub fn display_change(change: f64) -> String {
    format::fixed(change.abs(), 2)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeView {
    pub is_positive: bool,
    pub display: String,
}

impl ChangeView {
    pub fn from_change(change: f64) -> Self {
        Self {
            is_positive: is_positive(change),
            display: display_change(change),
        }
    }

    pub fn arrow(&self) -> char {
        if self.is_positive { '▲' } else { '▼' }
    }
}

/// Headline Bitcoin price line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceView {
    pub usd: String,
    pub inr: String,
    pub change: ChangeView,
}

pub fn project_price(prices: &PriceSnapshot) -> PriceView {
    let btc = &prices.bitcoin;
    PriceView {
        usd: format::grouped(btc.usd),
        inr: format::grouped(btc.inr),
        change: ChangeView::from_change(btc.usd_24h_change),
    }
}

/// One trending coin as the sidebar and carousels show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRow {
    pub symbol: String,
    pub name: String,
    pub sparkline: Option<String>,
    pub change: ChangeView,
}

pub fn project_coin(coin: &TrendingCoin) -> CoinRow {
    let item = &coin.item;
    let change = item.change_24h(CHANGE_CURRENCY).unwrap_or(0.0);

    CoinRow {
        symbol: item.symbol.to_uppercase(),
        name: item.name.clone(),
        sparkline: item.sparkline.clone().filter(|s| !s.is_empty()),
        change: ChangeView::from_change(change),
    }
}

pub fn project_coins(coins: &[TrendingCoin]) -> Vec<CoinRow> {
    coins.iter().map(project_coin).collect()
}
