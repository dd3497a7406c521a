//! HTTP client for the Alpha Vantage query API.

use std::time::Duration;

use serde_json::error::Category;
use url::Url;

use crate::{
    query::{Query, TimeSeriesQuery},
    types::{DailyTimeSeries, TimeSeriesResponse},
    Error,
};

/// Default timeout applied to the single request of a lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Alpha Vantage query API.
///
/// Each lookup is one GET request. The client never retries; a failed
/// request comes back as an [`Error`] value and the caller decides what to
/// do with it.
pub struct Client {
    /// Base URL for the API. Defaults to `https://www.alphavantage.co`.
    base_api_url: String,
    api_key: String,
    timeout: Duration,
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url("https://www.alphavantage.co", api_key)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replaces the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn get_url(&self, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}/query", &self.base_api_url).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::Network(format!("invalid base URL: {}", e))
        })?;
        let mut url = query.add_to_url(&url);
        url.query_pairs_mut().append_pair("apikey", &self.api_key);
        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<String, Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e.to_string())
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Network(describe_transport_error(&e))
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(describe_transport_error(&e))
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::Network(format!("HTTP {}: {}", status.as_u16(), snippet)));
        }

        Ok(body)
    }

    /// Fetches the daily series for the query's symbol.
    ///
    /// Returns [`Error::Parse`] when the body is not JSON and
    /// [`Error::NotFound`] when it is JSON without any dated entries.
    pub async fn get_daily_time_series(
        &self,
        query: &TimeSeriesQuery,
    ) -> Result<DailyTimeSeries, Error> {
        let url = self.get_url(query)?;
        let body = self.get_body(url).await?;
        parse_daily_time_series(&body, &query.symbol)
    }
}

/// Parses and validates a `TIME_SERIES_DAILY` body.
///
/// `requested` is the symbol that was asked for; it stands in for the
/// canonical symbol when the metadata block lacks one.
pub fn parse_daily_time_series(body: &str, requested: &str) -> Result<DailyTimeSeries, Error> {
    let parsed = serde_json::from_str::<TimeSeriesResponse>(body).map_err(|e| {
        let snippet = truncate_body(body);
        match e.classify() {
            Category::Data => {
                tracing::warn!("Unexpected response shape: {} | body: {}", e, snippet);
                Error::NotFound(format!("unexpected response shape: {}", e))
            }
            _ => {
                tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
                Error::Parse(e.to_string())
            }
        }
    })?;

    let message = parsed.api_message().map(str::to_string);
    let entries = match parsed.time_series {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            let reason = message.unwrap_or_else(|| "empty time series".to_string());
            tracing::warn!("No daily data for {}: {}", requested, reason);
            return Err(Error::NotFound(reason));
        }
    };

    let meta = parsed.meta_data.unwrap_or_default();
    Ok(DailyTimeSeries {
        symbol: meta
            .symbol
            .unwrap_or_else(|| requested.to_uppercase()),
        last_refreshed: meta.last_refreshed,
        entries,
    })
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
