//! Append-only per-symbol CSV files.
//!
//! Each symbol lives in `<SYMBOL>.csv` inside the store directory. Two row
//! layouts are in use and readers rely on column position, never headers:
//!
//! - summary rows, `<trade_date>,<open_price>`, written by [`QuoteStore::append`]
//! - price log rows, `<YYYY-MM-DD>, <price>`, written by [`QuoteStore::append_price_log`]
//!
//! Callers keep one layout per file. Both layouts carry the price in
//! column 1.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;

use crate::record::{format_price, QuoteRecord};

/// Written in place of a price the lookup could not provide.
pub const MISSING_PRICE: &str = "N/A";

/// Date plus price; both layouts have at least this many columns.
pub const MIN_FIELDS: usize = 2;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no stored quotes at {}", .0.display())]
    Missing(PathBuf),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed quote file: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "{}: line {} has {} field(s), expected at least {}",
        .path.display(),
        .line,
        .found,
        MIN_FIELDS
    )]
    ShortRow {
        path: PathBuf,
        line: u64,
        found: usize,
    },
}

/// One stored line, split into its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRow {
    fields: Vec<String>,
}

impl StoredRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// A summary row `(trade_date, open)`. `None` when the record has no
    /// opening price.
    pub fn summary(record: &QuoteRecord) -> Option<Self> {
        let open = record.open()?;
        Some(Self::new(vec![
            record.trade_date().format("%Y-%m-%d").to_string(),
            format_price(open),
        ]))
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// The leading date column, if it parses.
    pub fn trade_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.field(0)?, "%Y-%m-%d").ok()
    }
}

pub struct QuoteStore {
    dir: PathBuf,
}

impl Default for QuoteStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl QuoteStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// `<dir>/<SYMBOL>.csv`. The symbol is trusted to be a safe file name.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }

    fn open_for_append(&self, symbol: &str) -> Result<File, StorageError> {
        let path = self.path_for(symbol);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                tracing::error!("Failed to open {} for append: {}", path.display(), e);
                StorageError::Io(e)
            })
    }

    /// Appends each row as one line, creating the file if needed.
    ///
    /// There is no atomicity beyond what the file system gives a plain
    /// append; a crash part-way can leave a partial last line.
    pub fn append(&self, symbol: &str, rows: &[StoredRow]) -> Result<(), StorageError> {
        let file = self.open_for_append(symbol)?;
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        for row in rows {
            wtr.write_record(row.fields())?;
        }
        wtr.flush()?;
        tracing::debug!("Appended {} rows to {}", rows.len(), self.path_for(symbol).display());
        Ok(())
    }

    /// Appends a single price log line `<date>, <price>`.
    pub fn append_price_log(
        &self,
        symbol: &str,
        date: NaiveDate,
        price: Option<f64>,
    ) -> Result<(), StorageError> {
        let price = price.map(format_price);
        let line = format!(
            "{}, {}\n",
            date.format("%Y-%m-%d"),
            price.as_deref().unwrap_or(MISSING_PRICE)
        );
        let mut file = self.open_for_append(symbol)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Every stored row, oldest append first. Rows are not sorted by date.
    ///
    /// A row with fewer than [`MIN_FIELDS`] columns fails the whole read.
    pub fn read_all(&self, symbol: &str) -> Result<Vec<StoredRow>, StorageError> {
        let path = self.path_for(symbol);
        let file = File::open(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                tracing::warn!("No quote file at {}", path.display());
                StorageError::Missing(path.clone())
            } else {
                tracing::error!("Failed to open {}: {}", path.display(), e);
                StorageError::Io(e)
            }
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| {
                tracing::error!("Failed to decode {}: {}", path.display(), e);
                StorageError::Csv(e)
            })?;
            if record.len() < MIN_FIELDS {
                let line = record.position().map_or(rows.len() as u64 + 1, |p| p.line());
                tracing::error!(
                    "{}: line {} has {} field(s)",
                    path.display(),
                    line,
                    record.len()
                );
                return Err(StorageError::ShortRow {
                    path,
                    line,
                    found: record.len(),
                });
            }
            rows.push(StoredRow::new(record.iter().map(str::to_string).collect()));
        }
        Ok(rows)
    }
}
