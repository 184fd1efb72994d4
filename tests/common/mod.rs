use std::sync::Arc;
use std::time::Duration;
use transparent_price_cache::api::TablePriceSource;
use transparent_price_cache::TransparentCache;

pub const MAX_AGE: Duration = Duration::from_secs(30);

// Helper to create a table source with a few coin prices
pub fn create_coin_source(latency: Duration) -> Arc<TablePriceSource> {
    Arc::new(
        TablePriceSource::from_pairs([("bitcoin", 65000.0), ("ethereum", 3200.0), ("solana", 150.0)])
            .with_latency(latency),
    )
}

pub fn create_cache(source: Arc<TablePriceSource>, max_age: Duration) -> TransparentCache {
    TransparentCache::new(source, max_age)
}

pub fn sorted(mut prices: Vec<f64>) -> Vec<f64> {
    prices.sort_by(|a, b| a.partial_cmp(b).expect("prices are finite"));
    prices
}
