use chrono::{DateTime, Utc};

use crate::market_data::types::{PriceSnapshot, TrendingCoin};

/// Everything one successful fetch cycle produced.
/// Replaced wholesale by the next accepted cycle, never merged.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSnapshot {
    /// Sequence number of the cycle that produced this snapshot.
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub prices: PriceSnapshot,
    pub trending: Vec<TrendingCoin>,
}
