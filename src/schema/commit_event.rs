//! Raw commit event definition
//!
//! Only the timestamp matters for aggregation. The other fields are carried so a
//! fetch layer can hand over its records without reshaping them.

use crate::date_index::DateIndex;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Naive timestamp layouts, interpreted as UTC
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Offset timestamp layouts beyond RFC 3339 (`git log --date=iso`)
const OFFSET_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"];

/// A single commit (or any countable event) observed at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitEvent {
    /// Event time, ideally RFC 3339 in UTC. Non-string JSON values are kept as
    /// their JSON text so they fail date extraction instead of the whole batch.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[serde(alias = "timestampUTC", alias = "timestamp_utc", alias = "date")]
    pub timestamp: Option<String>,
    /// Commit hash, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Repository the event belongs to (`owner/name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(alias = "repo")]
    pub repository: Option<String>,
}

impl CommitEvent {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            ..Default::default()
        }
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    /// UTC calendar date of the event, `None` when the timestamp is missing or unusable
    pub fn utc_date(&self) -> Option<NaiveDate> {
        self.timestamp.as_deref().and_then(timestamp_to_utc_date)
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Reduce a timestamp string to its UTC calendar date.
///
/// Offsets are applied before the time of day is dropped, so
/// `2024-01-01T23:30:00-05:00` lands on 2024-01-02.
pub fn timestamp_to_utc_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for format in OFFSET_TIMESTAMP_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.date());
        }
    }

    DateIndex::parse(raw).ok()
}
