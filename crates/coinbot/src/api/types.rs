//! Market data records returned by the CoinLore API
//!
//! CoinLore mixes JSON numbers and numeric strings for the same field
//! depending on the endpoint, so numeric fields go through the lenient
//! deserializers at the bottom of this file.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Snapshot of a single coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// URL slug, e.g. `bitcoin-cash`
    #[serde(rename = "nameid", default)]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub rank: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_usd: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_btc: f64,
    #[serde(rename = "market_cap_usd", default, deserialize_with = "lenient_f64")]
    pub market_cap_usd: f64,
    #[serde(rename = "volume24", default, deserialize_with = "lenient_f64")]
    pub volume_24h_usd: f64,
    #[serde(rename = "percent_change_1h", default, deserialize_with = "lenient_f64")]
    pub change_1h: f64,
    #[serde(rename = "percent_change_24h", default, deserialize_with = "lenient_f64")]
    pub change_24h: f64,
    #[serde(rename = "percent_change_7d", default, deserialize_with = "lenient_f64")]
    pub change_7d: f64,
    #[serde(default, alias = "time", with = "chrono::serde::ts_seconds_option")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CoinRecord {
    /// Case-insensitive substring match against name, symbol and slug
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.symbol.to_lowercase().contains(needle)
            || self.slug.to_lowercase().contains(needle)
    }
}

/// Market wide statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    #[serde(rename = "total_mcap", default, deserialize_with = "lenient_f64")]
    pub total_market_cap_usd: f64,
    #[serde(rename = "total_volume", default, deserialize_with = "lenient_f64")]
    pub total_volume_usd: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub active_markets: u64,
    #[serde(rename = "coins_count", default, deserialize_with = "lenient_u64")]
    pub active_currencies: u64,
    #[serde(rename = "btc_d", default, deserialize_with = "lenient_f64")]
    pub btc_dominance: f64,
    #[serde(rename = "eth_d", default, deserialize_with = "lenient_f64")]
    pub eth_dominance: f64,
    #[serde(rename = "mcap_change", default, deserialize_with = "lenient_f64")]
    pub market_cap_change_24h: f64,
    #[serde(default, alias = "time", with = "chrono::serde::ts_seconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A trading venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    #[serde(rename = "name_id", default)]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume_usd: f64,
    #[serde(default, alias = "active_pairs", deserialize_with = "lenient_u64")]
    pub pairs: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(u64),
    Float(f64),
    Text(String),
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Lenient::Int(n)) => Ok(n as f64),
        Some(Lenient::Float(n)) => Ok(n),
        Some(Lenient::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Lenient::Text(s)) => s.trim().parse().map_err(de::Error::custom),
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    lenient_f64(deserializer).map(|n| if n.is_sign_negative() { 0 } else { n as u64 })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(String::new()),
        Some(Lenient::Int(n)) => Ok(n.to_string()),
        Some(Lenient::Float(n)) => Ok(n.to_string()),
        Some(Lenient::Text(s)) => Ok(s),
    }
}
