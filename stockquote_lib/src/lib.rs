//! Library layer for stockquote: lookups, per-symbol quote files, and
//! price statistics.
//!
//! Wraps the `alphavantage_api` client with normalization into
//! [`QuoteRecord`]s, an in-memory TTL cache, append-only CSV storage,
//! and a small SQLite store for followed tickers.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod lookup;
pub mod market_data;
pub mod record;
pub mod retry;
pub mod store;

pub use alphavantage_api;

pub use aggregate::{AggregationError, PriceAggregator};
pub use config::{Config, LatestSelection};
pub use db::{DbError, NewTicker, Ticker, TickerDb};
pub use error::QuoteError;
pub use lookup::{render_lookup, LookupFacade, UNAVAILABLE};
pub use market_data::{LookupError, MarketDataClient};
pub use record::QuoteRecord;
pub use retry::RetryPolicy;
pub use store::{QuoteStore, StorageError, StoredRow};
