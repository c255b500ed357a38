//! CoinLore API client
//!
//! Public API, no key required. Every call goes through the configured
//! [`RetryPolicy`]; only transport failures are retried.

use super::{ApiError, CoinRecord, ExchangeRecord, GlobalStats, MarketData};
use crate::config::BotConfig;
use async_trait::async_trait;
use coinbot_utils::RetryPolicy;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

const GLOBAL_PATH: &str = "api/global/";
const TICKERS_PATH: &str = "api/tickers/";
const TICKER_PATH: &str = "api/ticker/";
const EXCHANGES_PATH: &str = "api/exchanges/";

/// HTTP client for the CoinLore market data API
#[derive(Debug, Clone)]
pub struct CoinloreClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl CoinloreClient {
    /// Create a client from the bot configuration
    pub fn new(config: &BotConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("coinbot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = Url::parse(&config.api_base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            retry: config.retry_policy(),
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json(&self, operation: &str, url: Url) -> Result<Value, ApiError> {
        self.retry
            .execute(operation, || self.get_once(url.clone()))
            .await
    }

    async fn get_once(&self, url: Url) -> Result<Value, ApiError> {
        debug!(%url, "requesting market data");

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "market data request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| decode_error(&url, e))
    }
}

fn decode_error(url: &Url, reason: impl ToString) -> ApiError {
    ApiError::Decode {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

fn decode<T: DeserializeOwned>(url: &Url, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| decode_error(url, e))
}

fn decode_global(url: &Url, value: Value) -> Result<GlobalStats, ApiError> {
    let stats = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| decode_error(url, "empty global stats array"))?,
        obj @ Value::Object(_) => obj,
        other => return Err(decode_error(url, format!("unexpected payload: {other}"))),
    };
    decode(url, stats)
}

fn decode_tickers(url: &Url, value: Value) -> Result<Vec<CoinRecord>, ApiError> {
    let (data, info_time) = match value {
        Value::Object(mut obj) => {
            let info_time = obj
                .get("info")
                .and_then(|info| info.get("time"))
                .and_then(Value::as_i64);
            let data = obj
                .remove("data")
                .ok_or_else(|| decode_error(url, "missing `data` field"))?;
            (data, info_time)
        }
        list @ Value::Array(_) => (list, None),
        other => return Err(decode_error(url, format!("unexpected payload: {other}"))),
    };

    let mut coins: Vec<CoinRecord> = decode(url, data)?;
    if let Some(ts) = info_time.and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)) {
        for coin in coins.iter_mut().filter(|c| c.last_updated.is_none()) {
            coin.last_updated = Some(ts);
        }
    }
    Ok(coins)
}

fn decode_ticker(url: &Url, value: Value) -> Result<Option<CoinRecord>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .into_iter()
            .next()
            .map(|item| decode(url, item))
            .transpose(),
        obj @ Value::Object(_) => decode(url, obj).map(Some),
        other => Err(decode_error(url, format!("unexpected payload: {other}"))),
    }
}

fn decode_exchanges(url: &Url, value: Value) -> Result<Vec<ExchangeRecord>, ApiError> {
    let entries: Vec<(Option<String>, Value)> = match value {
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items.into_iter().map(|v| (None, v)).collect(),
            Some(other) => return Err(decode_error(url, format!("unexpected `data`: {other}"))),
            None => obj.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        },
        Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
        Value::Null => Vec::new(),
        other => return Err(decode_error(url, format!("unexpected payload: {other}"))),
    };

    let total = entries.len();
    let exchanges: Vec<ExchangeRecord> = entries
        .into_iter()
        .filter_map(|(key, entry)| match serde_json::from_value::<ExchangeRecord>(entry) {
            Ok(mut exchange) => {
                if exchange.id.is_empty() {
                    exchange.id = key.unwrap_or_default();
                }
                Some(exchange)
            }
            Err(e) => {
                warn!(error = %e, "skipping malformed exchange entry");
                None
            }
        })
        .collect();

    if total > 0 && exchanges.is_empty() {
        return Err(decode_error(url, "no valid exchange entries"));
    }

    debug!(valid = exchanges.len(), total, "decoded exchanges");
    Ok(exchanges)
}

#[async_trait]
impl MarketData for CoinloreClient {
    async fn fetch_global_stats(&self) -> Result<GlobalStats, ApiError> {
        let url = self.endpoint(GLOBAL_PATH, &[])?;
        let value = self.get_json("fetch_global_stats", url.clone()).await?;
        decode_global(&url, value)
    }

    async fn fetch_tickers(&self, offset: u32, limit: u32) -> Result<Vec<CoinRecord>, ApiError> {
        let url = self.endpoint(
            TICKERS_PATH,
            &[("start", offset.to_string()), ("limit", limit.to_string())],
        )?;
        let value = self.get_json("fetch_tickers", url.clone()).await?;
        let coins = decode_tickers(&url, value)?;
        info!(offset, limit, count = coins.len(), "fetched tickers");
        Ok(coins)
    }

    async fn fetch_ticker(&self, coin_id: &str) -> Result<Option<CoinRecord>, ApiError> {
        let url = self.endpoint(TICKER_PATH, &[("id", coin_id.to_string())])?;
        let value = self.get_json("fetch_ticker", url.clone()).await?;
        let coin = decode_ticker(&url, value)?;
        if coin.is_none() {
            info!(coin_id, "coin not found upstream");
        }
        Ok(coin)
    }

    async fn fetch_exchanges(&self) -> Result<Vec<ExchangeRecord>, ApiError> {
        let url = self.endpoint(EXCHANGES_PATH, &[])?;
        let value = self.get_json("fetch_exchanges", url.clone()).await?;
        decode_exchanges(&url, value)
    }
}
