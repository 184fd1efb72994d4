use crate::api::coingecko::DEFAULT_BASE_URL;
use crate::error::Error;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub cache: CacheConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Freshness window; zero disables caching.
    pub max_age_ms: u64,
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Table,
    CoinGecko,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    #[serde(default)]
    pub latency_ms: u64,
    #[serde(default)]
    pub prices: HashMap<String, f64>,
    #[serde(default)]
    pub coingecko: CoinGeckoConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub vs_currency: String,
    pub api_key: Option<String>,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LookupConfig {
    pub items: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config = Self::parse(&config_str)?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        match self.source.kind {
            SourceKind::Table => {
                if self.source.prices.is_empty() {
                    return Err(Error::ConfigError(
                        "Table source needs at least one entry in [source.prices]".into(),
                    ));
                }
                if let Some((code, price)) = self
                    .source
                    .prices
                    .iter()
                    .find(|(_, price)| !price.is_finite() || **price < 0.0)
                {
                    return Err(Error::ConfigError(format!(
                        "Invalid price for {}: {}",
                        code, price
                    )));
                }
            }
            SourceKind::CoinGecko => {
                if self.source.coingecko.base_url.trim().is_empty() {
                    return Err(Error::ConfigError("CoinGecko base_url is empty".into()));
                }
                if self.source.coingecko.vs_currency.trim().is_empty() {
                    return Err(Error::ConfigError("CoinGecko vs_currency is empty".into()));
                }
            }
        }
        Ok(())
    }
}
