//! The normalized price observation for one symbol on one day.

use alphavantage_api::types::{DailyBar, DailyEntry};
use chrono::NaiveDate;

/// One day's opening and closing price for a symbol.
///
/// At least one of `open` and `close` is always present: the constructor
/// refuses to build a record with neither, and there is no way to change
/// a record once built.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    symbol: String,
    trade_date: NaiveDate,
    open: Option<f64>,
    close: Option<f64>,
}

impl QuoteRecord {
    /// Returns `None` when both prices are absent.
    pub fn new(
        symbol: &str,
        trade_date: NaiveDate,
        open: Option<f64>,
        close: Option<f64>,
    ) -> Option<Self> {
        if open.is_none() && close.is_none() {
            return None;
        }
        Some(Self {
            symbol: symbol.to_uppercase(),
            trade_date,
            open,
            close,
        })
    }

    /// Normalizes one API entry.
    ///
    /// `None` for a null day, an unparseable date, or a day where neither
    /// price parses. A single unparseable price is simply absent.
    pub fn from_entry(symbol: &str, entry: &DailyEntry) -> Option<Self> {
        let bar = entry.bar.as_ref()?;
        let trade_date = match NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                tracing::debug!("Skipping {} entry with bad date {:?}: {}", symbol, entry.date, e);
                return None;
            }
        };
        let (open, close) = bar_prices(bar);
        let record = Self::new(symbol, trade_date, open, close);
        if record.is_none() {
            tracing::debug!("Skipping {} {}: no usable price", symbol, entry.date);
        }
        record
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    pub fn open(&self) -> Option<f64> {
        self.open
    }

    pub fn close(&self) -> Option<f64> {
        self.close
    }
}

fn bar_prices(bar: &DailyBar) -> (Option<f64>, Option<f64>) {
    (
        bar.open.as_deref().and_then(parse_price),
        bar.close.as_deref().and_then(parse_price),
    )
}

/// Parses a string-encoded price. Anything that is not a finite,
/// non-negative number counts as absent.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Renders a price the way it is shown to people and written to disk:
/// whole numbers keep one decimal place (`100.0`), everything else uses
/// the shortest exact form (`101.5`).
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{:.1}", price)
    } else {
        price.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(date: &str, open: Option<&str>, close: Option<&str>) -> DailyEntry {
        DailyEntry {
            date: date.to_string(),
            bar: Some(DailyBar {
                open: open.map(str::to_string),
                close: close.map(str::to_string),
                ..DailyBar::default()
            }),
        }
    }

    #[test]
    fn new_requires_a_price() {
        assert!(QuoteRecord::new("AAPL", date(2024, 1, 2), None, None).is_none());
        assert!(QuoteRecord::new("AAPL", date(2024, 1, 2), Some(1.0), None).is_some());
        assert!(QuoteRecord::new("AAPL", date(2024, 1, 2), None, Some(1.0)).is_some());
    }

    #[test]
    fn symbol_is_uppercased() {
        let record = QuoteRecord::new("aapl", date(2024, 1, 2), Some(1.0), None).unwrap();
        assert_eq!(record.symbol(), "AAPL");
    }

    #[test]
    fn from_entry_keeps_open_when_close_missing() {
        let record = QuoteRecord::from_entry("IBM", &entry("2024-03-08", Some("100.0"), None)).unwrap();
        assert_eq!(record.open(), Some(100.0));
        assert_eq!(record.close(), None);
        assert_eq!(record.trade_date(), date(2024, 3, 8));
    }

    #[test]
    fn from_entry_unparseable_close_is_absent() {
        let record =
            QuoteRecord::from_entry("IBM", &entry("2024-03-08", Some("100.5"), Some("n/a"))).unwrap();
        assert_eq!(record.open(), Some(100.5));
        assert_eq!(record.close(), None);
    }

    #[test]
    fn from_entry_discards_when_nothing_parses() {
        assert!(QuoteRecord::from_entry("IBM", &entry("2024-03-08", Some("x"), Some(""))).is_none());
        assert!(QuoteRecord::from_entry("IBM", &entry("2024-03-08", None, None)).is_none());
    }

    #[test]
    fn from_entry_null_day() {
        let null_day = DailyEntry {
            date: "2024-03-08".to_string(),
            bar: None,
        };
        assert!(QuoteRecord::from_entry("IBM", &null_day).is_none());
    }

    #[test]
    fn from_entry_bad_date() {
        assert!(QuoteRecord::from_entry("IBM", &entry("March 8", Some("1.0"), None)).is_none());
    }

    #[test]
    fn parse_price_rejects_negative_and_nan() {
        assert_eq!(parse_price(" 12.50 "), Some(12.5));
        assert_eq!(parse_price("-1"), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn format_price_variants() {
        assert_eq!(format_price(101.5), "101.5");
        assert_eq!(format_price(100.0), "100.0");
        assert_eq!(format_price(196.06), "196.06");
        assert_eq!(format_price(0.0), "0.0");
    }
}
