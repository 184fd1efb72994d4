use crate::api::{PriceSource, TablePriceSource};
use crate::config::{CacheConfig, CoinGeckoConfig, Config, LookupConfig, SourceConfig, SourceKind};
use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// Helper to create a default test config
pub fn create_test_config() -> Config {
    let prices = HashMap::from([
        ("bitcoin".to_string(), 65000.0),
        ("ethereum".to_string(), 3200.0),
        ("solana".to_string(), 150.0),
    ]);

    Config {
        cache: CacheConfig { max_age_ms: 60_000 },
        source: SourceConfig {
            kind: SourceKind::Table,
            latency_ms: 10,
            prices,
            coingecko: CoinGeckoConfig::default(),
        },
        lookup: LookupConfig {
            items: vec!["bitcoin".to_string(), "ethereum".to_string()],
        },
    }
}

// Source with A=10, B=20, C=30 and the given latency
pub fn create_test_source(latency: Duration) -> Arc<TablePriceSource> {
    Arc::new(
        TablePriceSource::from_pairs([("A", 10.0), ("B", 20.0), ("C", 30.0)])
            .with_latency(latency),
    )
}

/// Source that fails `failing` immediately, never answers for `hanging`, and
/// prices everything else at 1.0.
#[derive(Debug)]
pub struct ScriptedPriceSource {
    pub failing: String,
    pub hanging: String,
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    async fn get_price_for(&self, item_code: &str) -> Result<f64, FetchError> {
        if item_code == self.failing {
            return Err(FetchError::Unavailable(format!("{} is down", item_code)));
        }
        if item_code == self.hanging {
            std::future::pending::<()>().await;
        }
        Ok(1.0)
    }
}

/// Source whose task panics for `panicking` and prices everything else at 1.0.
#[derive(Debug)]
pub struct PanickingPriceSource {
    pub panicking: String,
}

#[async_trait]
impl PriceSource for PanickingPriceSource {
    async fn get_price_for(&self, item_code: &str) -> Result<f64, FetchError> {
        if item_code == self.panicking {
            panic!("price service crashed for {}", item_code);
        }
        Ok(1.0)
    }
}
