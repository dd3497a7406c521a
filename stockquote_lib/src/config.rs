//! Process-wide settings, built once at start-up and passed down explicitly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "ALPHA_ADVANTAGE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// How `fetch_latest` picks the most recent day out of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LatestSelection {
    /// Trust the API's newest-first ordering and take the first entry.
    #[default]
    FirstEntry,
    /// Take the entry with the greatest date, whatever its position.
    MaxDate,
}

impl FromStr for LatestSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" | "first-entry" => Ok(Self::FirstEntry),
            "max-date" | "max" => Ok(Self::MaxDate),
            other => Err(format!("unknown latest selection: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    /// Directory holding the `<SYMBOL>.csv` files.
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    /// Zero disables response caching.
    pub cache_ttl: Duration,
    pub latest_selection: LatestSelection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from("."),
            request_timeout: alphavantage_api::DEFAULT_TIMEOUT,
            cache_ttl: Duration::from_secs(60),
            latest_selection: LatestSelection::FirstEntry,
        }
    }
}

impl Config {
    /// Reads settings from the process environment.
    ///
    /// A missing API key is not an error here; the request goes out with
    /// an empty key and the API's refusal surfaces as a lookup failure.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_key = match get(API_KEY_VAR) {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => {
                tracing::warn!("{} is not set; lookups will be rejected by the API", API_KEY_VAR);
                String::new()
            }
        };

        let latest_selection = match get("STOCKQUOTE_LATEST") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using first entry", e);
                LatestSelection::FirstEntry
            }),
            None => defaults.latest_selection,
        };

        Self {
            api_key,
            base_url: get("STOCKQUOTE_BASE_URL").unwrap_or(defaults.base_url),
            data_dir: get("STOCKQUOTE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            request_timeout: parse_secs(get("STOCKQUOTE_TIMEOUT_SECS"))
                .unwrap_or(defaults.request_timeout),
            cache_ttl: parse_secs(get("STOCKQUOTE_CACHE_TTL_SECS")).unwrap_or(defaults.cache_ttl),
            latest_selection,
        }
    }
}

fn parse_secs(value: Option<String>) -> Option<Duration> {
    value
        .and_then(|val| val.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
