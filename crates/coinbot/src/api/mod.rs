//! Market data access
//!
//! [`MarketData`] is the seam between the navigation state machine and the
//! upstream API. [`CoinloreClient`] is the production implementation.

pub mod coinlore;
pub mod types;

pub use coinlore::CoinloreClient;
pub use types::{CoinRecord, ExchangeRecord, GlobalStats};

use async_trait::async_trait;
use coinbot_utils::Retryable;
use thiserror::Error;

/// Failure of a market data call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport level failure (connect, timeout, broken body)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Upstream answered 2xx with a body we cannot decode
    #[error("Malformed payload from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Retryable for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(e) => !(e.is_builder() || e.is_status() || e.is_decode()),
            ApiError::Status { .. } | ApiError::Decode { .. } | ApiError::InvalidUrl(_) => false,
        }
    }
}

/// Market data operations consumed by the bot
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Market wide statistics
    async fn fetch_global_stats(&self) -> Result<GlobalStats, ApiError>;

    /// Coins ordered by rank, starting at `offset`
    async fn fetch_tickers(&self, offset: u32, limit: u32) -> Result<Vec<CoinRecord>, ApiError>;

    /// A single coin, `Ok(None)` when the id is unknown upstream
    async fn fetch_ticker(&self, coin_id: &str) -> Result<Option<CoinRecord>, ApiError>;

    /// All exchanges known upstream, in upstream order
    async fn fetch_exchanges(&self) -> Result<Vec<ExchangeRecord>, ApiError>;
}
