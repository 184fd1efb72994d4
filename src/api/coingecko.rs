use crate::api::PriceSource;
use crate::error::{Error, FetchError, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// `/simple/price` body: coin id -> currency -> price.
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Price source backed by the CoinGecko `/simple/price` endpoint.
///
/// Item codes are CoinGecko coin ids such as `bitcoin`.
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
    client: Client,
    base_url: String,
    vs_currency: String,
    api_key: Option<String>,
}

impl CoinGeckoSource {
    pub fn new(base_url: String, vs_currency: String, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            vs_currency: vs_currency.to_lowercase(),
            api_key,
        })
    }

    fn price_url(&self) -> String {
        format!("{}/simple/price", self.base_url)
    }
}

fn extract_price(
    body: &SimplePriceResponse,
    item_code: &str,
    vs_currency: &str,
) -> std::result::Result<f64, FetchError> {
    let price = body
        .get(item_code)
        .and_then(|quotes| quotes.get(vs_currency))
        .copied()
        .ok_or_else(|| FetchError::NotFound(format!("{} (in {})", item_code, vs_currency)))?;

    if !price.is_finite() || price < 0.0 {
        return Err(FetchError::InvalidResponse(format!(
            "Invalid price for {}: {}",
            item_code, price
        )));
    }
    Ok(price)
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn get_price_for(&self, item_code: &str) -> std::result::Result<f64, FetchError> {
        let mut request = self.client.get(self.price_url()).query(&[
            ("ids", item_code),
            ("vs_currencies", self.vs_currency.as_str()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        debug!("Requesting CoinGecko price for {}", item_code);
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("CoinGecko rate limit hit while fetching {}", item_code);
                return Err(FetchError::Unavailable("rate limit exceeded".into()));
            }
            status => {
                return Err(FetchError::Unavailable(format!(
                    "unexpected status {} for {}",
                    status, item_code
                )));
            }
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
        extract_price(&body, item_code, &self.vs_currency)
    }
}
