use anyhow::Result;
use serde::Serialize;
use stockquote_lib::{StoredRow, Ticker};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "md" | "markdown" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    trade_date: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
}

#[derive(Tabled, Serialize)]
struct TickerRow {
    #[tabled(rename = "Ticker")]
    #[serde(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Last Price")]
    #[serde(rename = "Last Price")]
    last_price: String,
    #[tabled(rename = "Updated")]
    #[serde(rename = "Updated")]
    updated_at: String,
}

fn build_history_rows(rows: &[StoredRow]) -> Vec<HistoryRow> {
    rows.iter()
        .map(|r| HistoryRow {
            trade_date: r.field(0).unwrap_or_default().to_string(),
            open: r.field(1).unwrap_or_default().to_string(),
        })
        .collect()
}

fn build_ticker_rows(tickers: &[Ticker]) -> Vec<TickerRow> {
    tickers
        .iter()
        .map(|t| TickerRow {
            ticker: t.ticker.clone(),
            name: t.name.clone().unwrap_or_default(),
            last_price: t.last_price.clone().unwrap_or_default(),
            updated_at: t.updated_at.clone().unwrap_or_default(),
        })
        .collect()
}

fn print_rows<T: Tabled + Serialize>(rows: Vec<T>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

pub fn print_history(rows: &[StoredRow], format: &OutputFormat) -> Result<()> {
    print_rows(build_history_rows(rows), format)
}

pub fn print_tickers(tickers: &[Ticker], format: &OutputFormat) -> Result<()> {
    print_rows(build_ticker_rows(tickers), format)
}

/// Prints a single value: bare for text formats, as a JSON object otherwise.
pub fn print_value<T: Serialize + std::fmt::Display>(
    symbol: &str,
    key: &str,
    value: &T,
    format: &OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let mut obj = serde_json::Map::new();
            obj.insert("symbol".to_string(), serde_json::Value::from(symbol));
            obj.insert(
                key.to_string(),
                serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            );
            print_json(&obj);
        }
        _ => println!("{}", value),
    }
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
