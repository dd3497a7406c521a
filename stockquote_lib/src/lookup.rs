//! Use cases composed from the market data client and the quote files.
//!
//! This is the one layer that turns a failed lookup into a value meant for
//! people (`"Unavailable"`). Everything below it keeps the typed error.

use chrono::Local;

use crate::aggregate::PriceAggregator;
use crate::config::Config;
use crate::db::{NewTicker, Ticker, TickerDb};
use crate::error::QuoteError;
use crate::market_data::{LookupError, MarketDataClient};
use crate::record::{format_price, QuoteRecord};
use crate::store::{QuoteStore, StorageError, StoredRow};

/// Shown when no price could be looked up.
pub const UNAVAILABLE: &str = "Unavailable";

/// Renders a lookup outcome: the closing price when there is one,
/// otherwise the opening price, otherwise [`UNAVAILABLE`].
pub fn render_lookup(result: &Result<QuoteRecord, LookupError>) -> String {
    match result {
        Ok(record) => render_record(record),
        Err(e) => {
            tracing::debug!("Rendering failed lookup as unavailable: {}", e);
            UNAVAILABLE.to_string()
        }
    }
}

fn render_record(record: &QuoteRecord) -> String {
    if let Some(close) = record.close() {
        return format!("{} (Closing)", format_price(close));
    }
    if let Some(open) = record.open() {
        return format!("{} (Opening)", format_price(open));
    }
    UNAVAILABLE.to_string()
}

pub struct LookupFacade {
    client: MarketDataClient,
    store: QuoteStore,
}

impl LookupFacade {
    pub fn new(config: &Config) -> Self {
        Self::from_parts(MarketDataClient::new(config), QuoteStore::new(&config.data_dir))
    }

    pub fn from_parts(client: MarketDataClient, store: QuoteStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &MarketDataClient {
        &self.client
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// `"<price> (Closing)"`, `"<price> (Opening)"` or `"Unavailable"`.
    pub async fn current_price_display(&self, symbol: &str) -> String {
        render_lookup(&self.client.fetch_latest(symbol).await)
    }

    /// The latest opening price, or `None` when the lookup fails or the
    /// day has no opening price.
    pub async fn price_by_symbol(&self, symbol: &str) -> Option<f64> {
        match self.client.fetch_latest(symbol).await {
            Ok(record) => record.open(),
            Err(e) => {
                tracing::info!("No opening price for {}: {}", symbol, e);
                None
            }
        }
    }

    /// Appends today's price to the symbol's price log. An absent price is
    /// logged as `N/A`.
    pub fn write_price_by_symbol(
        &self,
        symbol: &str,
        price: Option<f64>,
    ) -> Result<(), StorageError> {
        let today = Local::now().date_naive();
        self.store.append_price_log(symbol, today, price)
    }

    /// The symbol's history as summary rows `(trade_date, open)`, newest
    /// first. Days without an opening price are left out.
    pub async fn historical_price(&self, symbol: &str) -> Result<Vec<StoredRow>, LookupError> {
        let records = self.client.fetch_history(symbol).await?;
        Ok(records.iter().filter_map(StoredRow::summary).collect())
    }

    /// Fetches the history and appends it to the symbol's file. Returns
    /// the number of rows written.
    pub async fn record_history(&self, symbol: &str) -> Result<usize, QuoteError> {
        let rows = self.historical_price(symbol).await?;
        self.store.append(symbol, &rows)?;
        tracing::info!("Recorded {} rows for {}", rows.len(), symbol);
        Ok(rows.len())
    }

    /// Mean of the stored price column for `symbol`.
    pub fn average_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        let rows = self.store.read_all(symbol)?;
        Ok(PriceAggregator::average(&rows)?)
    }

    /// Seeds and stores a ticker from a single lookup. `Ok(None)` when the
    /// lookup fails.
    pub async fn create_from_lookup(
        &self,
        db: &TickerDb,
        symbol: &str,
    ) -> Result<Option<Ticker>, QuoteError> {
        let record = match self.client.fetch_latest(symbol).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Cannot create ticker {}: {}", symbol, e);
                return Ok(None);
            }
        };
        let ticker = db.insert_ticker(&NewTicker {
            ticker: record.symbol().to_string(),
            name: None,
            last_price: Some(render_record(&record)),
        })?;
        Ok(Some(ticker))
    }

    /// The stored ticker, or a freshly looked-up one.
    pub async fn find_or_create(
        &self,
        db: &TickerDb,
        symbol: &str,
    ) -> Result<Option<Ticker>, QuoteError> {
        if let Some(ticker) = db.find_by_symbol(symbol)? {
            return Ok(Some(ticker));
        }
        self.create_from_lookup(db, symbol).await
    }

    /// Re-renders and stores the display price of an existing ticker.
    /// `Ok(None)` when the ticker is not stored.
    pub async fn refresh_last_price(
        &self,
        db: &TickerDb,
        symbol: &str,
    ) -> Result<Option<String>, QuoteError> {
        let display = self.current_price_display(symbol).await;
        if db.update_last_price(symbol, &display)? {
            Ok(Some(display))
        } else {
            Ok(None)
        }
    }
}
