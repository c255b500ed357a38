//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::api::{ApiError, CoinRecord, ExchangeRecord, GlobalStats, MarketData};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn coin(id: &str, name: &str, symbol: &str, rank: u64) -> CoinRecord {
    CoinRecord {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        rank,
        price_usd: 100.0 / rank.max(1) as f64,
        price_btc: 0.0,
        market_cap_usd: 1_000_000_000.0 / rank.max(1) as f64,
        volume_24h_usd: 1_000_000.0,
        change_1h: 0.1,
        change_24h: -1.5,
        change_7d: 4.0,
        last_updated: None,
    }
}

pub fn exchange(id: &str, name: &str, volume_usd: f64) -> ExchangeRecord {
    ExchangeRecord {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase(),
        volume_usd,
        pairs: 100,
    }
}

pub fn global_stats() -> GlobalStats {
    GlobalStats {
        total_market_cap_usd: 2.4e12,
        total_volume_usd: 9.1e10,
        active_markets: 31_000,
        active_currencies: 12_000,
        btc_dominance: 52.3,
        eth_dominance: 16.9,
        market_cap_change_24h: -0.8,
        updated_at: None,
    }
}

/// Bitcoin, Ethereum, Bitcoin Cash followed by `filler` generic coins
pub fn fixture_coins(filler: usize) -> Vec<CoinRecord> {
    let mut coins = vec![
        coin("90", "Bitcoin", "BTC", 1),
        coin("80", "Ethereum", "ETH", 2),
        coin("2321", "Bitcoin Cash", "BCH", 3),
    ];
    coins.extend((0..filler).map(|i| {
        let rank = i as u64 + 4;
        coin(&format!("{}", 1000 + i), &format!("Token {rank}"), &format!("T{rank}"), rank)
    }));
    coins
}

/// In-memory market serving a fixed coin list
pub struct FakeMarket {
    pub coins: Vec<CoinRecord>,
    pub exchanges: Vec<ExchangeRecord>,
    pub failing: AtomicBool,
    pub ticker_calls: Mutex<Vec<(u32, u32)>>,
}

impl FakeMarket {
    pub fn new(coins: Vec<CoinRecord>) -> Self {
        Self {
            coins,
            exchanges: vec![
                exchange("1", "Small", 10.0),
                exchange("2", "Large", 1_000.0),
                exchange("3", "Medium", 100.0),
            ],
            failing: AtomicBool::new(false),
            ticker_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn page_calls(&self) -> Vec<(u32, u32)> {
        self.ticker_calls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                status: 503,
                url: "fake://market".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn fetch_global_stats(&self) -> Result<GlobalStats, ApiError> {
        self.check()?;
        Ok(global_stats())
    }

    async fn fetch_tickers(&self, offset: u32, limit: u32) -> Result<Vec<CoinRecord>, ApiError> {
        self.ticker_calls.lock().unwrap().push((offset, limit));
        self.check()?;
        Ok(self
            .coins
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fetch_ticker(&self, coin_id: &str) -> Result<Option<CoinRecord>, ApiError> {
        self.check()?;
        Ok(self.coins.iter().find(|c| c.id == coin_id).cloned())
    }

    async fn fetch_exchanges(&self) -> Result<Vec<ExchangeRecord>, ApiError> {
        self.check()?;
        Ok(self.exchanges.clone())
    }
}
