mod time_series;
pub use self::time_series::{DailyBar, DailyEntry, DailyTimeSeries, MetaData, TimeSeriesResponse};
