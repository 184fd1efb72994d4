use crate::api::PriceSource;
use crate::error::{Error, Result};
use crate::metrics;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;


/// A price together with the moment it was fetched from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedPrice {
    pub value: f64,
    pub assigned_at: Instant,
}

impl CachedPrice {
    fn new(value: f64) -> Self {
        Self {
            value,
            assigned_at: Instant::now(),
        }
    }

    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.assigned_at.elapsed() < max_age
    }
}

/// Caching layer in front of a slow [`PriceSource`].
///
/// Prices older than `max_age` are never returned; they are refetched. The
/// store lock only guards single map reads and writes and is never held while
/// the source is being called, so two concurrent misses for one item may both
/// reach the source. Clones share the same store.
#[derive(Clone)]
pub struct TransparentCache {
    source: Arc<dyn PriceSource>,
    max_age: Duration,
    prices: Arc<Mutex<HashMap<String, CachedPrice>>>,
}

impl fmt::Debug for TransparentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransparentCache")
            .field("source", &format_args!("<PriceSource>"))
            .field("max_age", &self.max_age)
            .field("prices", &self.prices)
            .finish()
    }
}

impl TransparentCache {
    pub fn new(source: Arc<dyn PriceSource>, max_age: Duration) -> Self {
        Self {
            source,
            max_age,
            prices: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.prices.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.prices.lock().await.is_empty()
    }

    /// Returns the price for `item_code`, from the cache when the stored entry
    /// is still fresh and from the source otherwise.
    pub async fn get_price_for(&self, item_code: &str) -> Result<f64> {
        let cached = self.prices.lock().await.get(item_code).copied();

        match cached {
            Some(entry) if entry.is_fresh(self.max_age) => {
                debug!("Cache hit for {}: {}", item_code, entry.value);
                metrics::CACHE_HITS.inc();
                return Ok(entry.value);
            }
            Some(_) => debug!("Cached price for {} is stale, refetching", item_code),
            None => debug!("Cache miss for {}", item_code),
        }
        metrics::CACHE_MISSES.inc();

        let timer = metrics::SOURCE_LATENCY.start_timer();
        let fetched = self.source.get_price_for(item_code).await;
        timer.observe_duration();

        let price = fetched.map_err(|e| {
            warn!("Price source failed for {}: {}", item_code, e);
            metrics::SOURCE_ERRORS.inc();
            Error::price_fetch(item_code, e)
        })?;

        self.prices
            .lock()
            .await
            .insert(item_code.to_string(), CachedPrice::new(price));
        Ok(price)
    }

    /// Looks up every item concurrently, one task per entry in `item_codes`
    /// (duplicates included).
    ///
    /// Prices come back in completion order, not input order. The first
    /// failure is returned as soon as it arrives; lookups still in flight keep
    /// running in the background and their results are dropped.
    pub async fn get_prices_for<S: AsRef<str>>(&self, item_codes: &[S]) -> Result<Vec<f64>> {
        let (price_tx, mut price_rx) = mpsc::unbounded_channel();
        let (error_tx, mut error_rx) = mpsc::unbounded_channel();

        for item_code in item_codes {
            let cache = self.clone();
            let item_code = item_code.as_ref().to_string();
            let price_tx = price_tx.clone();
            let error_tx = error_tx.clone();
            tokio::spawn(async move {
                // Receivers are gone once the batch has already failed.
                match cache.get_price_for(&item_code).await {
                    Ok(price) => {
                        let _ = price_tx.send(price);
                    }
                    Err(e) => {
                        let _ = error_tx.send(e);
                    }
                }
            });
        }
        drop(price_tx);
        drop(error_tx);

        let mut results = Vec::with_capacity(item_codes.len());
        for _ in 0..item_codes.len() {
            tokio::select! {
                Some(price) = price_rx.recv() => results.push(price),
                Some(err) = error_rx.recv() => return Err(err),
                else => {
                    return Err(Error::InternalError(
                        "price lookup task ended without reporting a result".into(),
                    ));
                }
            }
        }

        debug!("Batch lookup of {} items completed", results.len());
        Ok(results)
    }
}
