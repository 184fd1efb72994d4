use crate::api::PriceSource;
use crate::error::FetchError;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct TableState {
    prices: HashMap<String, f64>,
    calls: HashMap<String, usize>,
}

/// In-memory price source over a fixed table, with optional simulated latency.
///
/// Stands in for a remote service in smoke runs and tests, and counts every
/// call it receives.
#[derive(Debug, Default)]
pub struct TablePriceSource {
    state: Mutex<TableState>,
    latency: Duration,
    total_calls: AtomicUsize,
}

impl TablePriceSource {
    pub fn new(prices: HashMap<String, f64>) -> Self {
        Self {
            state: Mutex::new(TableState {
                prices,
                calls: HashMap::new(),
            }),
            latency: Duration::ZERO,
            total_calls: AtomicUsize::new(0),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(code, price)| (code.to_string(), price))
                .collect(),
        )
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn set_price(&self, item_code: &str, price: f64) {
        let mut state = self.state.lock().await;
        state.prices.insert(item_code.to_string(), price);
    }

    pub async fn remove_price(&self, item_code: &str) -> Option<f64> {
        let mut state = self.state.lock().await;
        state.prices.remove(item_code)
    }

    pub fn call_count(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub async fn calls_for(&self, item_code: &str) -> usize {
        let state = self.state.lock().await;
        state.calls.get(item_code).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PriceSource for TablePriceSource {
    async fn get_price_for(&self, item_code: &str) -> Result<f64, FetchError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.state.lock().await;
            *state.calls.entry(item_code.to_string()).or_insert(0) += 1;
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let state = self.state.lock().await;
        let price = state.prices.get(item_code).copied();
        debug!("Table source lookup for {}: {:?}", item_code, price);
        price.ok_or_else(|| FetchError::NotFound(item_code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_and_unknown_items() {
        let source = TablePriceSource::from_pairs([("A", 10.0)]);
        assert_eq!(source.get_price_for("A").await.ok(), Some(10.0));
        let err = source.get_price_for("Z").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(ref code) if code == "Z"));
        assert_eq!(source.call_count(), 2);
        assert_eq!(source.calls_for("A").await, 1);
        assert_eq!(source.calls_for("Z").await, 1);
    }

    #[tokio::test]
    async fn test_prices_can_change_at_runtime() {
        let source = TablePriceSource::from_pairs([("A", 10.0)]);
        source.set_price("A", 11.5).await;
        assert_eq!(source.get_price_for("A").await.ok(), Some(11.5));
        assert_eq!(source.remove_price("A").await, Some(11.5));
        assert!(source.get_price_for("A").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency() {
        let source = TablePriceSource::from_pairs([("A", 10.0)])
            .with_latency(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        assert!(source.get_price_for("A").await.is_ok());
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
