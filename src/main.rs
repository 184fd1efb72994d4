use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use std::time::Instant;

use transparent_price_cache::api::build_source;
use transparent_price_cache::cli::Cli;
use transparent_price_cache::config::Config;
use transparent_price_cache::{logging, metrics, Error, TransparentCache};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.debug, cli.log_file.as_deref())?;

    info!("Starting price cache smoke run...");

    // Load configuration
    let config_path = cli.config.unwrap_or_else(|| "config/config.toml".into());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;
    info!("Configuration loaded successfully.");

    metrics::init().map_err(Error::from)?;

    let source = build_source(&config.source)?;
    let cache = TransparentCache::new(source, config.cache.max_age());
    info!("Price cache initialized (max age: {:?}).", cache.max_age());

    let items = if cli.items.is_empty() {
        config.lookup.items.clone()
    } else {
        cli.items
    };
    if items.is_empty() {
        bail!("No items to look up: pass item codes or set lookup.items in the config");
    }

    let mut failed_rounds = 0;
    for round in 1..=cli.rounds {
        let started = Instant::now();
        match cache.get_prices_for(items.as_slice()).await {
            Ok(prices) => {
                let elapsed = started.elapsed();
                info!("Round {}: {} prices in {:?}", round, prices.len(), elapsed);
                println!("round {} ({:?}): {:?}", round, elapsed, prices);
            }
            Err(e) => {
                error!("Round {} failed: {}", round, e);
                failed_rounds += 1;
            }
        }
    }

    if cli.metrics {
        print!("{}", metrics::gather_text()?);
    }

    if failed_rounds > 0 {
        bail!("{} of {} rounds failed", failed_rounds, cli.rounds);
    }
    Ok(())
}
