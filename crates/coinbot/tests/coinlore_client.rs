use coinbot::api::{ApiError, CoinloreClient, MarketData};
use coinbot::config::BotConfig;
use coinbot_utils::{RetryPolicy, Retryable};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn client_for(base_url: &str) -> CoinloreClient {
    client_with_timeout(base_url, Duration::from_secs(2))
}

fn client_with_timeout(base_url: &str, timeout: Duration) -> CoinloreClient {
    let config = BotConfig::builder()
        .api_base_url(base_url)
        .request_timeout(timeout)
        .build()
        .unwrap();
    CoinloreClient::new(&config)
        .unwrap()
        .with_retry_policy(RetryPolicy::fast())
}

fn bitcoin_json() -> serde_json::Value {
    json!({
        "id": "90",
        "symbol": "BTC",
        "name": "Bitcoin",
        "nameid": "bitcoin",
        "rank": 1,
        "price_usd": "64250.50",
        "percent_change_24h": "-1.20",
        "percent_change_1h": "0.15",
        "percent_change_7d": "4.02",
        "price_btc": "1.00",
        "market_cap_usd": "1262000000000.12",
        "volume24": 35000000000.5,
        "volume24a": 34000000000.0,
        "csupply": "19600000.00",
        "tsupply": "19600000",
        "msupply": "21000000"
    })
}

// ============================================================================
// Tickers
// ============================================================================

#[tokio::test]
async fn test_fetch_tickers_sends_offset_and_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tickers/"))
        .and(query_param("start", "10"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [bitcoin_json()],
            "info": { "coins_num": 12000, "time": 1_700_000_000 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let coins = tokio_test::assert_ok!(client.fetch_tickers(10, 10).await);

    assert_eq!(coins.len(), 1);
    let bitcoin = &coins[0];
    assert_eq!(bitcoin.id, "90");
    assert_eq!(bitcoin.slug, "bitcoin");
    assert!((bitcoin.price_usd - 64_250.5).abs() < f64::EPSILON);
    assert!((bitcoin.change_24h + 1.2).abs() < 1e-9);
    assert_eq!(
        bitcoin.last_updated.map(|t| t.timestamp()),
        Some(1_700_000_000)
    );
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/proxy/api/tickers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&format!("{}/proxy", mock_server.uri()));
    let coins = client.fetch_tickers(0, 10).await.unwrap();

    assert!(coins.is_empty());
}

// ============================================================================
// Single ticker
// ============================================================================

#[tokio::test]
async fn test_fetch_ticker_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ticker/"))
        .and(query_param("id", "90"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([bitcoin_json()])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let coin = client.fetch_ticker("90").await.unwrap().unwrap();

    assert_eq!(coin.name, "Bitcoin");
    assert_eq!(coin.rank, 1);
}

#[tokio::test]
async fn test_fetch_ticker_empty_array_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ticker/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    assert!(client.fetch_ticker("999999").await.unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_ticker_empty_body_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ticker/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    assert!(client.fetch_ticker("999999").await.unwrap().is_none());
}

// ============================================================================
// Global stats and exchanges
// ============================================================================

#[tokio::test]
async fn test_fetch_global_stats() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/global/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "coins_count": 12094,
            "active_markets": 31476,
            "total_mcap": 2_400_000_000_000.5,
            "total_volume": 91_000_000_000.0,
            "btc_d": "52.30",
            "eth_d": "16.90",
            "mcap_change": "-0.81",
            "volume_change": "3.2",
            "avg_change_percent": "-0.4"
        }])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let stats = client.fetch_global_stats().await.unwrap();

    assert_eq!(stats.active_currencies, 12_094);
    assert_eq!(stats.active_markets, 31_476);
    assert!((stats.btc_dominance - 52.3).abs() < 1e-9);
    assert!((stats.market_cap_change_24h + 0.81).abs() < 1e-9);
}

#[tokio::test]
async fn test_fetch_exchanges_keyed_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/exchanges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "5": {
                "name": "Binance",
                "name_id": "binance",
                "volume_usd": "15000000000.5",
                "active_pairs": "1450",
                "url": "https://www.binance.com",
                "country": "Japan"
            },
            "12": {
                "name": "Kraken",
                "name_id": "kraken",
                "volume_usd": 900000000,
                "active_pairs": 700
            },
            "99": { "volume_usd": "1" }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut exchanges = client.fetch_exchanges().await.unwrap();
    exchanges.sort_by(|a, b| a.id.cmp(&b.id));

    assert_eq!(exchanges.len(), 2);
    assert_eq!(exchanges[0].id, "12");
    assert_eq!(exchanges[0].pairs, 700);
    assert_eq!(exchanges[1].id, "5");
    assert_eq!(exchanges[1].name, "Binance");
    assert_eq!(exchanges[1].pairs, 1450);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/global/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let err = tokio_test::assert_err!(client.fetch_global_stats().await);

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tickers/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": [oops"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let err = client.fetch_tickers(0, 10).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_slow_response_times_out_and_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/global/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(2500)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_with_timeout(&mock_server.uri(), Duration::from_secs(1));
    let err = tokio_test::assert_err!(client.fetch_global_stats().await);

    match &err {
        ApiError::Network(e) => assert!(e.is_timeout()),
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused_is_retryable_network_error() {
    // Bind then drop a listener to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = client_for(&format!("http://127.0.0.1:{port}"));
    let err = client.fetch_exchanges().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.is_retryable());
}
