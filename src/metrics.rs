use lazy_static::lazy_static;
use prometheus::{Encoder, Histogram, IntCounter, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref CACHE_HITS: IntCounter = IntCounter::new(
        "price_cache_hits_total",
        "Lookups answered from a fresh cache entry"
    ).expect("valid metric definition");

    pub static ref CACHE_MISSES: IntCounter = IntCounter::new(
        "price_cache_misses_total",
        "Lookups that had to call the price source (missing or stale entry)"
    ).expect("valid metric definition");

    pub static ref SOURCE_ERRORS: IntCounter = IntCounter::new(
        "price_source_errors_total",
        "Failed calls to the price source"
    ).expect("valid metric definition");

    pub static ref SOURCE_LATENCY: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "price_source_latency_seconds",
            "Price source call latency in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0])
    ).expect("valid metric definition");
}

pub fn init() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(CACHE_HITS.clone()))?;
    REGISTRY.register(Box::new(CACHE_MISSES.clone()))?;
    REGISTRY.register(Box::new(SOURCE_ERRORS.clone()))?;
    REGISTRY.register(Box::new(SOURCE_LATENCY.clone()))?;
    Ok(())
}

/// Renders every registered metric in the Prometheus text format.
pub fn gather_text() -> crate::Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| crate::Error::InternalError(e.to_string()))
}
