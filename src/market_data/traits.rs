use async_trait::async_trait;

use crate::error::FetchError;
use crate::market_data::types::{PriceSnapshot, TrendingCoin};

/// Everything one fetch cycle produces.
pub type CycleData = (PriceSnapshot, Vec<TrendingCoin>);

/// A provider of Bitcoin prices and trending coins.
///
/// Implementors only supply the two requests; `fetch_cycle` joins them so
/// the cycle succeeds only when both do.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_prices(&self) -> Result<PriceSnapshot, FetchError>;

    async fn fetch_trending(&self) -> Result<Vec<TrendingCoin>, FetchError>;

    /// Issues both requests concurrently. The first failure fails the cycle
    /// and the other result is dropped.
    async fn fetch_cycle(&self) -> Result<CycleData, FetchError> {
        futures::try_join!(self.fetch_prices(), self.fetch_trending())
    }
}
