//! Parsing batches of commit events
//!
//! Batch-level problems (broken JSON, a line that is not an event) fail the whole
//! batch. Per-event timestamp problems do not: those events are reported by
//! [`EventAdapter::validate_events`] and skipped during aggregation.

use crate::error::CalendarError;
use crate::schema::commit_event::CommitEvent;
use serde::Serialize;

/// Minimum length of a leading hash in line-oriented input
const MIN_SHA_LEN: usize = 7;

/// Adapter for turning serialized event batches into [`CommitEvent`]s
pub struct EventAdapter;

impl EventAdapter {
    /// Parse a JSON string containing an array of events
    pub fn parse_array(json: &str) -> Result<Vec<CommitEvent>, CalendarError> {
        let events: Vec<CommitEvent> = serde_json::from_str(json)?;
        Ok(events)
    }

    /// Parse NDJSON (newline-delimited JSON) containing events
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<CommitEvent>, CalendarError> {
        let mut events = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<CommitEvent>(trimmed) {
                Ok(event) => events.push(event),
                Err(e) => {
                    return Err(CalendarError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(events)
    }

    /// Parse plain text with one event per line.
    ///
    /// Each line is a timestamp, optionally preceded by a commit hash, which is
    /// what `git log --format='%H %aI'` prints.
    pub fn parse_lines(text: &str) -> Vec<CommitEvent> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once(char::is_whitespace) {
                Some((head, rest)) if looks_like_sha(head) => {
                    CommitEvent::new(rest.trim()).with_sha(head)
                }
                _ => CommitEvent::new(line),
            })
            .collect()
    }

    /// Report events whose timestamp cannot be reduced to a date
    pub fn validate_events(events: &[CommitEvent]) -> Vec<EventIssue> {
        events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.utc_date().is_none())
            .map(|(index, event)| EventIssue {
                index,
                sha: event.sha.clone(),
                reason: match &event.timestamp {
                    None => "missing timestamp".to_string(),
                    Some(ts) => format!("unusable timestamp {ts:?}"),
                },
            })
            .collect()
    }
}

/// An event that will be skipped during aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventIssue {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub reason: String,
}

fn looks_like_sha(token: &str) -> bool {
    token.len() >= MIN_SHA_LEN && token.chars().all(|c| c.is_ascii_hexdigit())
}
