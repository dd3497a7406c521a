use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of a `TIME_SERIES_DAILY` response as it comes off the wire.
///
/// Every block is optional: the API answers unknown symbols, quota
/// exhaustion and missing keys with HTTP 200 and a single message field.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TimeSeriesResponse {
    #[serde(rename = "Meta Data", default)]
    pub meta_data: Option<MetaData>,

    #[serde(
        rename = "Time Series (Daily)",
        default,
        deserialize_with = "ordered_entries"
    )]
    pub time_series: Option<Vec<DailyEntry>>,

    #[serde(rename = "Error Message", default)]
    pub error_message: Option<String>,

    #[serde(rename = "Information", default)]
    pub information: Option<String>,

    #[serde(rename = "Note", default)]
    pub note: Option<String>,
}

impl TimeSeriesResponse {
    /// The message the API sent instead of data, if any.
    pub fn api_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.information.as_deref())
            .or(self.note.as_deref())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    #[serde(rename = "1. Information", default)]
    pub information: Option<String>,
    #[serde(rename = "2. Symbol", default)]
    pub symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed", default)]
    pub last_refreshed: Option<String>,
    #[serde(rename = "4. Output Size", default)]
    pub output_size: Option<String>,
    #[serde(rename = "5. Time Zone", default)]
    pub time_zone: Option<String>,
}

/// One day's values. Prices are string-encoded decimals and stay strings
/// here; turning them into numbers is the caller's policy.
///
/// A field of an unexpected type reads as absent instead of failing the
/// whole document. Bare JSON numbers are kept as their decimal text.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyBar {
    #[serde(rename = "1. open", default, deserialize_with = "lenient_text")]
    pub open: Option<String>,
    #[serde(rename = "2. high", default, deserialize_with = "lenient_text")]
    pub high: Option<String>,
    #[serde(rename = "3. low", default, deserialize_with = "lenient_text")]
    pub low: Option<String>,
    #[serde(rename = "4. close", default, deserialize_with = "lenient_text")]
    pub close: Option<String>,
    #[serde(rename = "5. volume", default, deserialize_with = "lenient_text")]
    pub volume: Option<String>,
}

impl DailyBar {
    /// Reads one day's value. Anything other than an object is `None`.
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A date key and its value, in the order the API sent them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyEntry {
    pub date: String,
    /// `None` when the API sent `null` or a non-object value for this date.
    pub bar: Option<DailyBar>,
}

/// A validated daily series: the canonical symbol plus at least one entry.
///
/// Entries keep the upstream order, which is newest first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyTimeSeries {
    pub symbol: String,
    pub last_refreshed: Option<String>,
    pub entries: Vec<DailyEntry>,
}

impl DailyTimeSeries {
    /// The entry the API lists first.
    pub fn first_entry(&self) -> Option<&DailyEntry> {
        self.entries.first()
    }
}

/// Deserializes the per-date object into a vector so the document order
/// survives (a map type would re-sort the keys).
fn ordered_entries<'de, D>(deserializer: D) -> Result<Option<Vec<DailyEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Option<Vec<DailyEntry>>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping dates to daily values, or null")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((date, value)) = map.next_entry::<String, Value>()? {
                let bar = DailyBar::from_value(value);
                if bar.is_none() {
                    tracing::debug!("Daily value for {} is not an object, skipping", date);
                }
                entries.push(DailyEntry { date, bar });
            }
            Ok(Some(entries))
        }
    }

    deserializer.deserialize_option(EntriesVisitor)
}
