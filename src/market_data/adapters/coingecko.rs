use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::market_data::traits::MarketDataSource;
use crate::market_data::types::{PriceSnapshot, TrendingCoin, TrendingResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const PRICE_ENDPOINT: &str = "simple/price";
const PRICE_QUERY: &str = "ids=bitcoin&vs_currencies=inr,usd&include_24hr_change=true";
const TRENDING_ENDPOINT: &str = "search/trending";

/// Thin client over the two public CoinGecko endpoints the dashboard uses.
#[derive(Clone, Debug)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("btc-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
    ) -> Result<T, FetchError> {
        let start = Instant::now();
        debug!(%url, "requesting");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                endpoint,
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis(),
                "non-success status"
            );
            return Err(FetchError::Http { endpoint, status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        let parsed = serde_json::from_slice(&body)
            .map_err(|source| FetchError::Parse { endpoint, source })?;

        debug!(
            endpoint,
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis(),
            "response received"
        );

        Ok(parsed)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_prices(&self) -> Result<PriceSnapshot, FetchError> {
        let url = format!("{}/{}?{}", self.base_url, PRICE_ENDPOINT, PRICE_QUERY);
        self.get_json(PRICE_ENDPOINT, url).await
    }

    async fn fetch_trending(&self) -> Result<Vec<TrendingCoin>, FetchError> {
        let url = format!("{}/{}", self.base_url, TRENDING_ENDPOINT);
        let response: TrendingResponse = self.get_json(TRENDING_ENDPOINT, url).await?;
        Ok(response.coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PRICE_BODY: &str = r#"{"bitcoin":{"inr":3700000,"inr_24h_change":-2.3,"usd":45000,"usd_24h_change":-2.5}}"#;
    const TRENDING_BODY: &str =
        r#"{"coins":[{"item":{"id":"x","symbol":"xyz","data":{"price_change_percentage_24h":{"usd":5.1}}}}]}"#;

    /// Serves canned responses keyed by request-path prefix until the test ends.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { return };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&buf);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                    let (status, body) = routes
                        .iter()
                        .find(|(prefix, _, _)| path.starts_with(prefix))
                        .map(|(_, status, body)| (*status, *body))
                        .unwrap_or((404, "{}"));

                    let response = format!(
                        "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{addr}/api/v3")
    }

    fn client(base_url: String) -> CoinGeckoClient {
        CoinGeckoClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = client("https://api.example.test/v3/".to_string());
        assert_eq!(client.base_url(), "https://api.example.test/v3");
    }

    #[tokio::test]
    async fn fetches_prices_and_trending() {
        let base = serve(vec![
            ("/api/v3/simple/price?ids=bitcoin&vs_currencies=inr,usd&include_24hr_change=true", 200, PRICE_BODY),
            ("/api/v3/search/trending", 200, TRENDING_BODY),
        ])
        .await;

        let (prices, coins) = client(base).fetch_cycle().await.unwrap();
        assert_eq!(prices.bitcoin.usd, 45000.0);
        assert_eq!(prices.bitcoin.inr, 3_700_000.0);
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].item.symbol, "xyz");
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let base = serve(vec![
            ("/api/v3/simple/price", 200, PRICE_BODY),
            ("/api/v3/search/trending", 429, r#"{"status":{"error_code":429}}"#),
        ])
        .await;

        let err = client(base).fetch_cycle().await.unwrap_err();
        assert!(matches!(err, FetchError::Http { endpoint: "search/trending", status: 429 }));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let base = serve(vec![
            ("/api/v3/simple/price", 200, r#"{"bitcoin":{"usd":"not a number"}}"#),
            ("/api/v3/search/trending", 200, TRENDING_BODY),
        ])
        .await;

        let err = client(base).fetch_cycle().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse { endpoint: "simple/price", .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Bind then drop so the port is very likely closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}")).fetch_prices().await.unwrap_err();
        assert_eq!(err.kind(), "network");
    }
}
