//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`OutputSize`].

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for the parameters every endpoint accepts.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets how many data points the API returns (`compact` = latest 100).
    fn with_output_size(mut self, output_size: OutputSize) -> Self
    where
        Self: Sized,
    {
        self.get_common().output_size = Some(output_size);
        self
    }
}

/// Size of the returned series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputSize {
    /// The latest 100 data points. This is the API default.
    #[default]
    Compact,
    /// The full available history.
    Full,
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSize::Compact => write!(f, "compact"),
            OutputSize::Full => write!(f, "full"),
        }
    }
}

impl FromStr for OutputSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            _ => Err(()),
        }
    }
}

/// Fields shared by all query types.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCommon {
    /// `None` leaves the parameter off and uses the API default.
    pub output_size: Option<OutputSize>,
}

impl QueryCommon {
    /// Appends the common parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(output_size) = self.output_size {
            url.query_pairs_mut()
                .append_pair("outputsize", &output_size.to_string());
        };
        url
    }
}
