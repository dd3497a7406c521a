//! SQLite storage for tickers and the users who follow them.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tickers (
    id INTEGER PRIMARY KEY,
    ticker TEXT NOT NULL UNIQUE,
    name TEXT,
    last_price TEXT,
    updated_at TEXT
);
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS user_tickers (
    user_id INTEGER NOT NULL,
    ticker_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, ticker_id),
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (ticker_id) REFERENCES tickers(id) ON DELETE CASCADE
);
";

const SCHEMA_VERSION: i32 = 1;

/// A followed symbol. `last_price` is the display string from the most
/// recent lookup and may be stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticker {
    pub id: i64,
    pub ticker: String,
    pub name: Option<String>,
    pub last_price: Option<String>,
    pub updated_at: Option<String>,
}

/// Fields for a ticker that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicker {
    pub ticker: String,
    pub name: Option<String>,
    pub last_price: Option<String>,
}

pub struct TickerDb {
    conn: Connection,
}

impl TickerDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Creates the tables if needed. Safe to call on every start.
    pub fn init(&self) -> Result<(), DbError> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        self.conn.execute_batch(SCHEMA)?;

        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    pub fn find_by_symbol(&self, symbol: &str) -> Result<Option<Ticker>, DbError> {
        self.conn
            .query_row(
                "SELECT id, ticker, name, last_price, updated_at
                 FROM tickers WHERE ticker = ?1",
                params![symbol.to_uppercase()],
                ticker_from_row,
            )
            .optional()
            .map_err(DbError::from)
    }

    /// Inserts a ticker, or refreshes `name` and `last_price` when the
    /// symbol is already stored.
    pub fn insert_ticker(&self, ticker: &NewTicker) -> Result<Ticker, DbError> {
        self.conn.execute(
            "INSERT INTO tickers (ticker, name, last_price, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(ticker) DO UPDATE SET
                name = COALESCE(excluded.name, tickers.name),
                last_price = excluded.last_price,
                updated_at = excluded.updated_at",
            params![ticker.ticker.to_uppercase(), ticker.name, ticker.last_price],
        )?;
        self.find_by_symbol(&ticker.ticker)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Returns whether a row was updated.
    pub fn update_last_price(&self, symbol: &str, last_price: &str) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE tickers SET last_price = ?1, updated_at = datetime('now')
             WHERE ticker = ?2",
            params![last_price, symbol.to_uppercase()],
        )?;
        Ok(changed > 0)
    }

    /// Links a user (created on first use) to a stored ticker.
    pub fn track(&mut self, user_email: &str, ticker_id: i64) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO users (email) VALUES (?1) ON CONFLICT(email) DO NOTHING",
            params![user_email],
        )?;
        let user_id: i64 = tx.query_row(
            "SELECT id FROM users WHERE email = ?1",
            params![user_email],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO user_tickers (user_id, ticker_id) VALUES (?1, ?2)",
            params![user_id, ticker_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn tickers_for_user(&self, user_email: &str) -> Result<Vec<Ticker>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.ticker, t.name, t.last_price, t.updated_at
             FROM tickers t
             JOIN user_tickers ut ON ut.ticker_id = t.id
             JOIN users u ON u.id = ut.user_id
             WHERE u.email = ?1
             ORDER BY t.ticker",
        )?;
        let rows = stmt.query_map(params![user_email], ticker_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn ticker_from_row(row: &Row<'_>) -> rusqlite::Result<Ticker> {
    Ok(Ticker {
        id: row.get(0)?,
        ticker: row.get(1)?,
        name: row.get(2)?,
        last_price: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
