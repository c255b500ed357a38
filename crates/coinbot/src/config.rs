//! Configuration for the bot and its market data client

use crate::error::{BotError, Result};
use crate::interface::BotPlatform;
use coinbot_utils::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default CoinLore API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.coinlore.net";

/// Configuration for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Base URL of the market data API
    pub api_base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Maximum number of attempts for a market data call
    pub max_retries: u32,

    /// Backoff before the first retry
    pub retry_backoff_base: Duration,

    /// Upper bound for a single backoff
    pub retry_backoff_max: Duration,

    /// Coins per browse page
    pub page_size: u32,

    /// Number of top coins scanned by a search
    pub search_pool_size: u32,

    /// Maximum number of search matches presented
    pub search_result_limit: usize,

    /// Maximum number of exchanges presented
    pub exchange_limit: usize,

    /// Platform used to pick the response formatter
    pub platform: BotPlatform,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_backoff_base: Duration::from_millis(500),
            retry_backoff_max: Duration::from_secs(5),
            page_size: 10,
            search_pool_size: 100,
            search_result_limit: 5,
            exchange_limit: 10,
            platform: BotPlatform::Cli,
        }
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(BotError::ConfigError(format!(
                "api_base_url is not a valid URL: {}",
                self.api_base_url
            )));
        }

        if self.max_retries == 0 {
            return Err(BotError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout < Duration::from_secs(1)
            || self.request_timeout > Duration::from_secs(60)
        {
            return Err(BotError::ConfigError(
                "request_timeout must be between 1 and 60 seconds".to_string(),
            ));
        }

        if self.page_size == 0 || self.search_pool_size == 0 {
            return Err(BotError::ConfigError(
                "page_size and search_pool_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Retry policy for market data calls
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            self.retry_backoff_base,
            self.retry_backoff_max,
            2.0,
        )
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    retry_backoff_max: Option<Duration>,
    page_size: Option<u32>,
    search_pool_size: Option<u32>,
    search_result_limit: Option<usize>,
    exchange_limit: Option<usize>,
    platform: Option<BotPlatform>,
}

impl BotConfigBuilder {
    /// Set the API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set maximum attempts per call
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set retry backoff cap
    pub fn retry_backoff_max(mut self, duration: Duration) -> Self {
        self.retry_backoff_max = Some(duration);
        self
    }

    /// Set browse page size
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set how many top coins a search scans
    pub fn search_pool_size(mut self, size: u32) -> Self {
        self.search_pool_size = Some(size);
        self
    }

    /// Set maximum number of search matches
    pub fn search_result_limit(mut self, limit: usize) -> Self {
        self.search_result_limit = Some(limit);
        self
    }

    /// Set maximum number of listed exchanges
    pub fn exchange_limit(mut self, limit: usize) -> Self {
        self.exchange_limit = Some(limit);
        self
    }

    /// Set the platform
    pub fn platform(mut self, platform: BotPlatform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Load overrides from `COINLORE_API_BASE`, `COINBOT_REQUEST_TIMEOUT_SECS`,
    /// `COINBOT_MAX_RETRIES` and `COINBOT_PLATFORM`
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("COINLORE_API_BASE") {
            self.api_base_url = Some(url);
        }

        if let Ok(raw) = std::env::var("COINBOT_REQUEST_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.request_timeout = Some(Duration::from_secs(secs)),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid COINBOT_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Ok(raw) = std::env::var("COINBOT_MAX_RETRIES") {
            match raw.parse::<u32>() {
                Ok(retries) => self.max_retries = Some(retries),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid COINBOT_MAX_RETRIES"),
            }
        }

        if let Ok(raw) = std::env::var("COINBOT_PLATFORM") {
            match raw.parse::<BotPlatform>() {
                Ok(platform) => self.platform = Some(platform),
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring invalid COINBOT_PLATFORM"),
            }
        }

        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();

        let config = BotConfig {
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            retry_backoff_max: self.retry_backoff_max.unwrap_or(defaults.retry_backoff_max),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            search_pool_size: self.search_pool_size.unwrap_or(defaults.search_pool_size),
            search_result_limit: self
                .search_result_limit
                .unwrap_or(defaults.search_result_limit),
            exchange_limit: self.exchange_limit.unwrap_or(defaults.exchange_limit),
            platform: self.platform.unwrap_or(defaults.platform),
        };

        config.validate()?;
        Ok(config)
    }
}
