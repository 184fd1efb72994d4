use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// How many times to run the batch lookup
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: u32,

    /// Print Prometheus metrics after the last round
    #[arg(short, long)]
    pub metrics: bool,

    /// Item codes to look up (defaults to `lookup.items` from the config)
    pub items: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["transparent-price-cache"]).expect("valid args");
        assert!(cli.config.is_none());
        assert!(!cli.debug);
        assert_eq!(cli.rounds, 2);
        assert!(cli.items.is_empty());
    }

    #[test]
    fn test_items_and_flags() {
        let cli = Cli::try_parse_from([
            "transparent-price-cache",
            "--config",
            "prices.toml",
            "-r",
            "3",
            "--metrics",
            "bitcoin",
            "ethereum",
        ])
        .expect("valid args");
        assert_eq!(cli.config, Some(PathBuf::from("prices.toml")));
        assert_eq!(cli.rounds, 3);
        assert!(cli.metrics);
        assert_eq!(cli.items, vec!["bitcoin", "ethereum"]);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(Cli::try_parse_from(["transparent-price-cache", "--rounds", "0"]).is_err());
    }
}
