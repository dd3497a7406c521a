//! Fetches daily series and normalizes them into [`QuoteRecord`]s.

use alphavantage_api::types::{DailyEntry, DailyTimeSeries};
use alphavantage_api::{Client, TimeSeriesQuery};
use chrono::NaiveDate;

use crate::cache::MemoryCache;
use crate::config::{Config, LatestSelection};
use crate::record::QuoteRecord;

/// Failure of a single lookup: `Network`, `Parse` or `NotFound`.
pub type LookupError = alphavantage_api::Error;

/// Market data lookups with a short-lived in-memory cache.
///
/// A cache hit skips the network entirely; a miss issues exactly one
/// request. Failures are never cached and never retried here.
pub struct MarketDataClient {
    inner: Client,
    cache: MemoryCache<DailyTimeSeries>,
    latest_selection: LatestSelection,
}

impl MarketDataClient {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Client::with_base_url(&config.base_url, &config.api_key)
                .with_timeout(config.request_timeout),
            cache: MemoryCache::new(config.cache_ttl),
            latest_selection: config.latest_selection,
        }
    }

    /// Creates a client with a custom base URL and the default settings
    /// otherwise. Used for testing.
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self::new(&Config {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            ..Config::default()
        })
    }

    async fn daily_series(&self, symbol: &str) -> Result<DailyTimeSeries, LookupError> {
        let cache_key = symbol.to_uppercase();
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(cached);
        }

        let series = self
            .inner
            .get_daily_time_series(&TimeSeriesQuery::new(symbol))
            .await?;
        self.cache.set(cache_key, series.clone());
        Ok(series)
    }

    /// The most recent day for `symbol`.
    ///
    /// With [`LatestSelection::FirstEntry`] this is whatever the API lists
    /// first. A most-recent day that is null or has no usable price is
    /// reported as `NotFound`; older days are not consulted.
    pub async fn fetch_latest(&self, symbol: &str) -> Result<QuoteRecord, LookupError> {
        let series = self.daily_series(symbol).await?;
        let entry = match self.latest_selection {
            LatestSelection::FirstEntry => series.first_entry(),
            LatestSelection::MaxDate => latest_by_date(&series.entries),
        }
        .ok_or_else(|| LookupError::NotFound(format!("no dated entries for {}", symbol)))?;

        QuoteRecord::from_entry(&series.symbol, entry).ok_or_else(|| {
            tracing::warn!("Latest entry {} for {} has no usable price", entry.date, series.symbol);
            LookupError::NotFound(format!(
                "latest entry {} for {} has no usable price",
                entry.date, series.symbol
            ))
        })
    }

    /// Every usable day for `symbol`, in the order the API sent them.
    ///
    /// Null days and days where neither price parses are left out, so the
    /// result can be empty even though the lookup succeeded.
    pub async fn fetch_history(&self, symbol: &str) -> Result<Vec<QuoteRecord>, LookupError> {
        let series = self.daily_series(symbol).await?;
        let records: Vec<QuoteRecord> = series
            .entries
            .iter()
            .filter_map(|entry| QuoteRecord::from_entry(&series.symbol, entry))
            .collect();
        tracing::debug!(
            "{}: {} of {} entries usable",
            series.symbol,
            records.len(),
            series.entries.len()
        );
        Ok(records)
    }
}

fn latest_by_date(entries: &[DailyEntry]) -> Option<&DailyEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d")
                .ok()
                .map(|date| (date, entry))
        })
        .max_by_key(|(date, _)| *date)
        .map(|(_, entry)| entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body(entries: &str) -> String {
        format!(
            r#"{{"Meta Data": {{"2. Symbol": "ACME"}}, "Time Series (Daily)": {{{}}}}}"#,
            entries
        )
    }

    async fn serve(server: &MockServer, body: String) {
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn latest_uses_first_entry() {
        let server = MockServer::start().await;
        serve(
            &server,
            body(
                r#""2024-03-07": {"1. open": "7.0", "4. close": "7.5"},
                   "2024-03-08": {"1. open": "8.0", "4. close": "8.5"}"#,
            ),
        )
        .await;

        let client = MarketDataClient::with_base_url(&server.uri(), "k");
        let record = client.fetch_latest("acme").await.unwrap();
        assert_eq!(record.symbol(), "ACME");
        assert_eq!(record.trade_date(), date(2024, 3, 7));
        assert_eq!(record.close(), Some(7.5));
    }

    #[tokio::test]
    async fn latest_by_max_date() {
        let server = MockServer::start().await;
        serve(
            &server,
            body(
                r#""2024-03-07": {"1. open": "7.0", "4. close": "7.5"},
                   "2024-03-08": {"1. open": "8.0", "4. close": "8.5"}"#,
            ),
        )
        .await;

        let client = MarketDataClient::new(&Config {
            base_url: server.uri(),
            latest_selection: LatestSelection::MaxDate,
            ..Config::default()
        });
        let record = client.fetch_latest("ACME").await.unwrap();
        assert_eq!(record.trade_date(), date(2024, 3, 8));
        assert_eq!(record.open(), Some(8.0));
    }

    #[tokio::test]
    async fn latest_null_day_is_not_found() {
        let server = MockServer::start().await;
        serve(
            &server,
            body(r#""2024-03-08": null, "2024-03-07": {"1. open": "7.0"}"#),
        )
        .await;

        let client = MarketDataClient::with_base_url(&server.uri(), "k");
        let err = client.fetch_latest("ACME").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn latest_timeout_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body(r#""2024-03-08": {"1. open": "8.0"}"#))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = MarketDataClient::new(&Config {
            base_url: server.uri(),
            request_timeout: Duration::from_millis(100),
            ..Config::default()
        });
        let err = client.fetch_latest("ACME").await.unwrap_err();
        assert!(matches!(err, LookupError::Network(_)));
    }

    #[tokio::test]
    async fn history_keeps_open_only_days_and_drops_unusable() {
        let server = MockServer::start().await;
        serve(
            &server,
            body(
                r#""2024-03-08": {"1. open": "100.0"},
                   "2024-03-07": null,
                   "2024-03-06": {"1. open": "n/a", "4. close": "--"},
                   "2024-03-05": {"1. open": "98.25", "4. close": "99.0"}"#,
            ),
        )
        .await;

        let client = MarketDataClient::with_base_url(&server.uri(), "k");
        let records = client.fetch_history("ACME").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].trade_date(), date(2024, 3, 8));
        assert_eq!(records[0].open(), Some(100.0));
        assert_eq!(records[0].close(), None);
        assert_eq!(records[1].trade_date(), date(2024, 3, 5));
    }

    #[tokio::test]
    async fn mistyped_older_days_do_not_sink_the_lookup() {
        let server = MockServer::start().await;
        serve(
            &server,
            body(
                r#""2024-03-08": {"1. open": "8.0", "4. close": "8.5"},
                   "2024-03-07": {"1. open": 99.0, "4. close": false},
                   "2024-03-06": "n/a",
                   "2024-03-05": {"1. open": [], "4. close": {}}"#,
            ),
        )
        .await;

        let client = MarketDataClient::with_base_url(&server.uri(), "k");
        let latest = client.fetch_latest("ACME").await.unwrap();
        assert_eq!(latest.trade_date(), date(2024, 3, 8));
        assert_eq!(latest.close(), Some(8.5));

        let records = client.fetch_history("ACME").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].trade_date(), date(2024, 3, 7));
        assert_eq!(records[1].open(), Some(99.0));
        assert_eq!(records[1].close(), None);
    }

    #[tokio::test]
    async fn second_lookup_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("symbol", "ACME"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(body(r#""2024-03-08": {"1. open": "8.0"}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = MarketDataClient::with_base_url(&server.uri(), "k");
        client.fetch_latest("ACME").await.unwrap();
        client.fetch_history("ACME").await.unwrap();
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Note": "slow down"}"#))
            .expect(2)
            .mount(&server)
            .await;

        let client = MarketDataClient::with_base_url(&server.uri(), "k");
        assert!(client.fetch_latest("ACME").await.is_err());
        assert!(client.fetch_latest("ACME").await.is_err());
    }

    #[test]
    fn latest_by_date_skips_bad_dates() {
        let entries = vec![
            DailyEntry {
                date: "garbage".to_string(),
                bar: None,
            },
            DailyEntry {
                date: "2024-01-02".to_string(),
                bar: None,
            },
            DailyEntry {
                date: "2023-12-29".to_string(),
                bar: None,
            },
        ];
        assert_eq!(latest_by_date(&entries).unwrap().date, "2024-01-02");
        assert!(latest_by_date(&[]).is_none());
    }
}
