use std::time::Duration;

use alphavantage_api::{Client, Error, OutputSize, Query, TimeSeriesQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_daily_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("daily_ibm.json");

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .and(query_param("symbol", "IBM"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let result = client
        .get_daily_time_series(&TimeSeriesQuery::new("IBM"))
        .await;
    assert!(result.is_ok());

    let series = result.unwrap();
    assert_eq!(series.symbol, "IBM");
    assert_eq!(series.last_refreshed.as_deref(), Some("2024-03-08"));
    assert_eq!(series.entries.len(), 3);
    assert_eq!(series.entries[0].date, "2024-03-08");
    let bar = series.entries[0].bar.as_ref().unwrap();
    assert_eq!(bar.open.as_deref(), Some("196.0600"));
    assert_eq!(bar.close.as_deref(), Some("195.9500"));
}

#[tokio::test]
async fn get_daily_sends_output_size() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("outputsize", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("daily_ibm.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let query = TimeSeriesQuery::new("IBM").with_output_size(OutputSize::Full);
    assert!(client.get_daily_time_series(&query).await.is_ok());
}

#[tokio::test]
async fn get_daily_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let err = client
        .get_daily_time_series(&TimeSeriesQuery::new("IBM"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn get_daily_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let err = client
        .get_daily_time_series(&TimeSeriesQuery::new("IBM"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn get_daily_rate_limited_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("rate_limited.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let err = client
        .get_daily_time_series(&TimeSeriesQuery::new("IBM"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(ref msg) if msg.contains("rate limit")));
}

#[tokio::test]
async fn get_daily_unknown_symbol_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("invalid_symbol.json")),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let err = client
        .get_daily_time_series(&TimeSeriesQuery::new("ZZZZZZ"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn get_daily_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("daily_ibm.json"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key")
        .with_timeout(Duration::from_millis(100));
    let err = client
        .get_daily_time_series(&TimeSeriesQuery::new("IBM"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn get_daily_connection_refused_is_network_error() {
    // Nothing listens on port 9 locally.
    let client = Client::with_base_url("http://127.0.0.1:9", "test-key")
        .with_timeout(Duration::from_secs(2));
    let err = client
        .get_daily_time_series(&TimeSeriesQuery::new("IBM"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}
