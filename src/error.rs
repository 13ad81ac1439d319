//! Error types for the contribution calendar engine

use thiserror::Error;

/// Errors raised while validating input or producing calendar output
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid week start: {0} (expected 0 for Sunday or 1 for Monday)")]
    InvalidWeekStart(u8),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse events: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    RenderError(String),
}
