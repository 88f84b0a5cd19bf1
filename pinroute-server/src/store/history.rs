//! Pin and search history entries.
//!
//! Both histories are newest-first and hold at most
//! [`MAX_HISTORY_ITEMS`] entries; the oldest fall off the end.

use serde::{Deserialize, Serialize};

use crate::domain::Pin;
use crate::resolve::{FirstResult, ResolveMode, SearchRecord};

/// Most entries kept in each history.
pub const MAX_HISTORY_ITEMS: usize = 50;

/// A pin as it was when placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinHistoryEntry {
    #[serde(flatten)]
    pub pin: Pin,

    /// Unix milliseconds.
    pub timestamp: i64,
}

/// One completed search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub query: String,

    /// `geocode` or `place_search`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Number of results the search produced.
    #[serde(default)]
    pub results: usize,

    #[serde(default)]
    pub first_result: Option<FirstResult>,

    /// Unix milliseconds.
    pub timestamp: i64,
}

impl SearchHistoryEntry {
    pub fn from_record(record: SearchRecord, timestamp: i64) -> Self {
        let kind = match record.mode {
            ResolveMode::Geocode => "geocode",
            ResolveMode::PlaceSearch => "place_search",
        };
        Self {
            query: record.query,
            kind: kind.to_string(),
            results: record.results,
            first_result: record.first_result,
            timestamp,
        }
    }
}

/// Insert `item` at the front, dropping the oldest beyond the limit.
pub fn push_newest<T>(history: &mut Vec<T>, item: T) {
    history.insert(0, item);
    history.truncate(MAX_HISTORY_ITEMS);
}

/// Current time in Unix milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
