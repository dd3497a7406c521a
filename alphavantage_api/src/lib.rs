mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{parse_daily_time_series, Client, DEFAULT_TIMEOUT};
pub use self::errors::Error;
pub use self::query::{OutputSize, Query, TimeSeriesQuery};
