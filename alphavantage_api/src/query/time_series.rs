use url::Url;

use super::{common::QueryCommon, Query};

/// Function identifier for the daily time-series endpoint.
pub const TIME_SERIES_DAILY: &str = "TIME_SERIES_DAILY";

/// Query for the daily time series of a single symbol.
///
/// The symbol is sent as given. No exchange or format validation happens
/// here: an unknown symbol only shows up as an empty response.
#[derive(Clone, Debug)]
pub struct TimeSeriesQuery {
    pub common: QueryCommon,
    pub symbol: String,
}

impl TimeSeriesQuery {
    pub fn new(symbol: &str) -> Self {
        Self {
            common: QueryCommon::default(),
            symbol: symbol.to_string(),
        }
    }
}

impl Query for TimeSeriesQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("function", TIME_SERIES_DAILY)
            .append_pair("symbol", self.symbol.as_str());
        self.common.add_to_url(&url)
    }
}
