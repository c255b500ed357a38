//! End-to-end conversations through the dispatcher

use async_trait::async_trait;
use coinbot::api::{ApiError, CoinRecord, ExchangeRecord, GlobalStats, MarketData};
use coinbot::config::BotConfig;
use coinbot::interface::{ResponseType, tokens};
use coinbot::navigation::NavState;
use coinbot::CoinBot;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

struct StaticMarket {
    coins: Vec<CoinRecord>,
    offline: AtomicBool,
    ticker_calls: AtomicUsize,
    delay: Duration,
}

impl StaticMarket {
    fn new(coins: Vec<CoinRecord>) -> Self {
        Self {
            coins,
            offline: AtomicBool::new(false),
            ticker_calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn check(&self) -> Result<(), ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                url: "static://market".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketData for StaticMarket {
    async fn fetch_global_stats(&self) -> Result<GlobalStats, ApiError> {
        self.check().await?;
        Ok(serde_json::from_value(serde_json::json!({
            "coins_count": 3,
            "active_markets": 10,
            "total_mcap": 1000.0,
            "total_volume": 100.0,
            "btc_d": 50.0,
            "eth_d": 20.0,
            "mcap_change": 1.5
        }))
        .unwrap())
    }

    async fn fetch_tickers(&self, offset: u32, limit: u32) -> Result<Vec<CoinRecord>, ApiError> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        Ok(self
            .coins
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fetch_ticker(&self, coin_id: &str) -> Result<Option<CoinRecord>, ApiError> {
        self.check().await?;
        Ok(self.coins.iter().find(|c| c.id == coin_id).cloned())
    }

    async fn fetch_exchanges(&self) -> Result<Vec<ExchangeRecord>, ApiError> {
        self.check().await?;
        Ok(Vec::new())
    }
}

fn coins() -> Vec<CoinRecord> {
    [
        ("90", "Bitcoin", "BTC", "bitcoin"),
        ("80", "Ethereum", "ETH", "ethereum"),
        ("2321", "Bitcoin Cash", "BCH", "bitcoin-cash"),
    ]
    .into_iter()
    .chain(std::iter::repeat(("0", "Filler", "FIL", "filler")).take(12))
    .enumerate()
    .map(|(i, (id, name, symbol, slug))| {
        let id = if id == "0" { format!("{}", 5000 + i) } else { id.to_string() };
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "symbol": symbol,
            "nameid": slug,
            "rank": i + 1,
            "price_usd": "10.0",
            "market_cap_usd": format!("{}", 1_000_000 / (i + 1)),
        }))
        .unwrap()
    })
    .collect()
}

fn bot_with(market: Arc<StaticMarket>) -> CoinBot {
    CoinBot::with_market(BotConfig::default(), market)
}

async fn state(bot: &CoinBot, user: &str) -> NavState {
    bot.navigator().sessions().snapshot(user).await.unwrap().nav_state
}

#[tokio::test]
async fn test_search_select_and_favorite() {
    let market = Arc::new(StaticMarket::new(coins()));
    let bot = bot_with(market);

    bot.handle_input("alice", "/start").await;
    let prompt = bot.handle_input("alice", tokens::MENU_SEARCH).await;
    assert!(prompt.action("/cancel").is_some());
    assert_eq!(state(&bot, "alice").await, NavState::AwaitingSearchQuery);

    let results = bot.handle_input("alice", "BIT").await;
    assert!(results.action("coin_90").is_some());
    assert!(results.action("coin_2321").is_some());
    assert!(results.action("coin_80").is_none());
    assert_eq!(state(&bot, "alice").await, NavState::Idle);

    let detail = bot.handle_input("alice", "coin_2321").await;
    assert!(detail.action("add_fav_2321").is_some());

    let toggled = bot.handle_input("alice", "add_fav_2321").await;
    assert!(toggled.action("rm_fav_2321").is_some());
    assert_eq!(
        state(&bot, "alice").await,
        NavState::ViewingDetail("2321".to_string())
    );

    let favorites = bot.handle_input("alice", "/favorites").await;
    assert!(favorites.content.contains("Bitcoin Cash"));
    assert!(favorites.action(tokens::CLEAR_FAVORITES).is_some());

    bot.handle_input("alice", tokens::CLEAR_FAVORITES).await;
    assert!(bot.favorites().list("alice").await.is_empty());
}

#[tokio::test]
async fn test_paging_to_the_end() {
    let market = Arc::new(StaticMarket::new(coins()));
    let bot = bot_with(market.clone());

    bot.handle_input("bob", "/top").await;
    let second = bot.handle_input("bob", tokens::NEXT_COINS).await;
    assert!(second.content.contains("Page 2"));

    let past_end = bot.handle_input("bob", tokens::NEXT_COINS).await;
    assert!(past_end.content.contains("No more coins"));
    assert_eq!(state(&bot, "bob").await, NavState::BrowsingList(1));

    bot.handle_input("bob", tokens::PREV_COINS).await;
    let first = bot.handle_input("bob", tokens::PREV_COINS).await;
    assert!(first.content.contains("first page"));
    assert_eq!(state(&bot, "bob").await, NavState::BrowsingList(0));
    assert_eq!(market.ticker_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_outage_keeps_state_and_recovers() {
    let market = Arc::new(StaticMarket::new(coins()));
    let bot = bot_with(market.clone());

    market.offline.store(true, Ordering::SeqCst);
    let failed = bot.handle_input("carol", "/top").await;
    assert_eq!(failed.response_type, ResponseType::Error);
    assert_eq!(state(&bot, "carol").await, NavState::Idle);

    let help = bot.handle_input("carol", "/help").await;
    assert!(!help.content.contains("Market Overview"));

    market.offline.store(false, Ordering::SeqCst);
    let retried = bot.handle_input("carol", "/top").await;
    assert!(retried.action("coin_90").is_some());
    assert_eq!(state(&bot, "carol").await, NavState::BrowsingList(0));
}

#[tokio::test]
async fn test_no_exchanges_is_not_an_error() {
    let bot = bot_with(Arc::new(StaticMarket::new(coins())));

    let response = bot.handle_input("dave", "/exchanges").await;
    assert_eq!(response.response_type, ResponseType::Text);
    assert!(response.content.contains("No exchange data"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_double_tap_is_serialized() {
    let market = Arc::new(StaticMarket::new(coins()).with_delay(Duration::from_millis(20)));
    let bot = Arc::new(bot_with(market));

    bot.handle_input("erin", "coin_90").await;

    let taps: Vec<_> = (0..2)
        .map(|_| {
            let bot = Arc::clone(&bot);
            tokio::spawn(async move { bot.handle_input("erin", "add_fav_90").await })
        })
        .collect();
    for tap in taps {
        tap.await.unwrap();
    }

    // Two serialized toggles cancel out
    assert!(bot.favorites().list("erin").await.is_empty());
    assert_eq!(
        state(&bot, "erin").await,
        NavState::ViewingDetail("90".to_string())
    );
}

#[tokio::test]
async fn test_users_are_independent() {
    let bot = bot_with(Arc::new(StaticMarket::new(coins())));

    bot.handle_input("frank", "/search").await;
    bot.handle_input("grace", "/top").await;

    assert_eq!(state(&bot, "frank").await, NavState::AwaitingSearchQuery);
    assert_eq!(state(&bot, "grace").await, NavState::BrowsingList(0));

    let absorbed = bot.handle_input("grace", "ethereum").await;
    assert!(absorbed.is_empty());
    let found = bot.handle_input("frank", "ethereum").await;
    assert!(found.action("coin_80").is_some());
}
