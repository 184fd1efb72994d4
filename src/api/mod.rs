use crate::config::{SourceConfig, SourceKind};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

pub mod coingecko;
pub mod table;

pub use coingecko::CoinGeckoSource;
pub use table::TablePriceSource;

/// A slow, fallible service that knows the current price of an item.
///
/// Implementations must be callable from many tasks at once without any
/// external synchronization.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn get_price_for(&self, item_code: &str) -> std::result::Result<f64, FetchError>;
}

/// Builds the price source described by the configuration.
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn PriceSource>> {
    match config.kind {
        SourceKind::Table => {
            info!(
                "Using table price source with {} items and {}ms latency",
                config.prices.len(),
                config.latency_ms
            );
            let source = TablePriceSource::new(config.prices.clone())
                .with_latency(Duration::from_millis(config.latency_ms));
            Ok(Arc::new(source))
        }
        SourceKind::CoinGecko => {
            let api_key = resolve_api_key(
                std::env::var("COINGECKO_API_KEY").ok(),
                config.coingecko.api_key.as_deref(),
            );
            info!(
                "Using CoinGecko price source at {} (currency: {})",
                config.coingecko.base_url, config.coingecko.vs_currency
            );
            let source = CoinGeckoSource::new(
                config.coingecko.base_url.clone(),
                config.coingecko.vs_currency.clone(),
                api_key,
            )?;
            Ok(Arc::new(source))
        }
    }
}

/// Picks the environment key over the configured one; blank keys count as unset.
fn resolve_api_key(env_key: Option<String>, config_key: Option<&str>) -> Option<String> {
    let usable = |key: &String| !key.trim().is_empty();
    env_key
        .filter(usable)
        .or_else(|| config_key.map(str::to_string).filter(usable))
}
