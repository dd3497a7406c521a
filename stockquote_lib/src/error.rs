//! Error types for the library layer.

use std::fmt;

use crate::aggregate::AggregationError;
use crate::db::DbError;
use crate::market_data::LookupError;
use crate::store::StorageError;

/// Errors produced by operations that chain a lookup, the quote files,
/// aggregation or the ticker database.
#[derive(Debug)]
pub enum QuoteError {
    /// The market data lookup failed.
    Lookup(LookupError),
    /// Reading or writing a quote file failed.
    Storage(StorageError),
    /// The stored prices could not be averaged.
    Aggregation(AggregationError),
    /// The ticker database failed.
    Db(DbError),
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup(e) => write!(f, "Lookup error: {}", e),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Aggregation(e) => write!(f, "Aggregation error: {}", e),
            Self::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for QuoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lookup(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Aggregation(e) => Some(e),
            Self::Db(e) => Some(e),
        }
    }
}

impl From<LookupError> for QuoteError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}

impl From<StorageError> for QuoteError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<AggregationError> for QuoteError {
    fn from(e: AggregationError) -> Self {
        Self::Aggregation(e)
    }
}

impl From<DbError> for QuoteError {
    fn from(e: DbError) -> Self {
        Self::Db(e)
    }
}
