pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use api::PriceSource;
pub use cache::{CachedPrice, TransparentCache};
pub use error::{Error, FetchError, Result};

// Declare tests module only when testing
#[cfg(test)]
pub mod tests;
