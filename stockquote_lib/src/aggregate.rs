//! Summary statistics over stored rows.
//!
//! Aggregation is strict: stored rows were written by this crate, so a
//! row that does not parse means the file is corrupt and the whole
//! computation fails.

use crate::store::StoredRow;

/// Column holding the price in both stored layouts.
pub const PRICE_COLUMN: usize = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("cannot average an empty set of prices")]
    EmptyInput,
    #[error("row {row}: {value:?} is not a price")]
    MalformedRow { row: usize, value: String },
}

pub struct PriceAggregator;

impl PriceAggregator {
    /// Unweighted mean of the price column.
    pub fn average(rows: &[StoredRow]) -> Result<f64, AggregationError> {
        Self::average_column(rows, PRICE_COLUMN)
    }

    /// Unweighted mean of `column`. Row numbers in errors are zero-based.
    fn average_column(rows: &[StoredRow], column: usize) -> Result<f64, AggregationError> {
        let prices = rows
            .iter()
            .enumerate()
            .map(|(row, stored)| {
                let value = stored.field(column).unwrap_or_default();
                parse_stored_price(value).ok_or_else(|| AggregationError::MalformedRow {
                    row,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        mean(&prices)
    }
}

fn parse_stored_price(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

fn mean(prices: &[f64]) -> Result<f64, AggregationError> {
    if prices.is_empty() {
        return Err(AggregationError::EmptyInput);
    }
    Ok(prices.iter().sum::<f64>() / prices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, price: &str) -> StoredRow {
        StoredRow::new(vec![date.to_string(), price.to_string()])
    }

    #[test]
    fn average_of_prices() {
        let rows = vec![
            row("2024-03-08", "100.0"),
            row("2024-03-07", "101.0"),
            row("2024-03-06", "105.5"),
        ];
        let avg = PriceAggregator::average(&rows).unwrap();
        assert!((avg - 102.166_666).abs() < 1e-5);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(
            PriceAggregator::average(&[]),
            Err(AggregationError::EmptyInput)
        );
    }

    #[test]
    fn non_numeric_price_fails_whole_average() {
        let rows = vec![row("2024-03-08", "100.0"), row("2024-03-09", "N/A")];
        assert_eq!(
            PriceAggregator::average(&rows),
            Err(AggregationError::MalformedRow {
                row: 1,
                value: "N/A".to_string()
            })
        );
    }

    #[test]
    fn short_row_is_malformed() {
        let rows = vec![StoredRow::new(vec!["2024-03-08".to_string()])];
        assert!(matches!(
            PriceAggregator::average(&rows),
            Err(AggregationError::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn other_column() {
        let rows = vec![
            StoredRow::new(vec!["d".into(), "1".into(), "10".into()]),
            StoredRow::new(vec!["d".into(), "2".into(), "20".into()]),
        ];
        assert_eq!(PriceAggregator::average_column(&rows, 2), Ok(15.0));
    }
}
