use std::io;
use std::result::Result as StdResult;
use thiserror::Error;

/// Failure reported by an underlying price source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Getting price from service for {item_code}: {source}")]
    PriceFetch {
        item_code: String,
        #[source]
        source: FetchError,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    pub fn price_fetch(item_code: impl Into<String>, source: FetchError) -> Self {
        Error::PriceFetch {
            item_code: item_code.into(),
            source,
        }
    }

    /// Item code of a failed price fetch, if this is one.
    pub fn item_code(&self) -> Option<&str> {
        match self {
            Error::PriceFetch { item_code, .. } => Some(item_code),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::InternalError(err.to_string())
    }
}

pub type Result<T> = StdResult<T, Error>;
