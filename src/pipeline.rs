//! Pipeline orchestration
//!
//! This module provides the public API for turning commit events into a
//! rendered contribution calendar. Stages run strictly in one direction:
//!
//! 1. EventAdapter - Parse serialized events
//! 2. ActivityAggregator - Count events per UTC date
//! 3. GridLayoutEngine - Place days into week columns and bucket intensities
//! 4. LabelPlacer - Choose month and weekday labels
//! 5. CalendarRenderer - Paint the layout (SVG or text)

use crate::aggregator::ActivityAggregator;
use crate::config::CalendarConfig;
use crate::error::CalendarError;
use crate::grid::GridLayoutEngine;
use crate::renderers::{CalendarRenderer, SvgRenderer, TextRenderer};
use crate::schema::{CommitEvent, EventAdapter};
use crate::types::{ActivitySeries, ActivitySummary, DateRange, GridLayout, LabelPlan};
use serde::Serialize;
use tracing::debug;

/// Everything a renderer or API response needs for one calendar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSnapshot {
    pub series: ActivitySeries,
    pub grid: GridLayout,
    pub labels: LabelPlan,
    pub summary: ActivitySummary,
}

/// Render a JSON array of commit events as an SVG calendar.
///
/// # Arguments
/// * `raw_json` - JSON array of events, each with a `timestamp`
/// * `range` - Dates to show; `None` means the last 365 days ending today (UTC)
///
/// # Example
/// ```ignore
/// let svg = events_to_svg(r#"[{"timestamp":"2024-06-15T10:00:00Z"}]"#, None)?;
/// ```
pub fn events_to_svg(raw_json: &str, range: Option<DateRange>) -> Result<String, CalendarError> {
    let processor = CalendarProcessor::new();
    let events = EventAdapter::parse_array(raw_json)?;
    let snapshot = processor.process_events(&events, range.unwrap_or_else(DateRange::ending_today));
    processor.render_svg(&snapshot)
}

/// Summarize a JSON array of commit events as an `ActivitySummary` JSON object
pub fn events_to_summary_json(
    raw_json: &str,
    range: Option<DateRange>,
) -> Result<String, CalendarError> {
    let events = EventAdapter::parse_array(raw_json)?;
    let series = ActivityAggregator::aggregate_by_date(&events);
    let summary = ActivityAggregator::summarize(
        &series,
        range.unwrap_or_else(DateRange::ending_today),
    );
    serde_json::to_string_pretty(&summary).map_err(CalendarError::JsonError)
}

/// Processor holding a validated configuration.
///
/// Holds no per-call state, so one instance can serve any number of calendars.
#[derive(Debug, Clone, Default)]
pub struct CalendarProcessor {
    config: CalendarConfig,
    engine: GridLayoutEngine,
}

impl CalendarProcessor {
    /// Create a processor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with a specific configuration
    pub fn with_config(config: CalendarConfig) -> Result<Self, CalendarError> {
        config.validate()?;
        Ok(Self {
            engine: GridLayoutEngine::new(config.metrics),
            config,
        })
    }

    /// Aggregate events and lay them out over `range`
    pub fn process_events(&self, events: &[CommitEvent], range: DateRange) -> CalendarSnapshot {
        let series = ActivityAggregator::aggregate_by_date(events);
        self.snapshot(series, range)
    }

    /// Lay out an already aggregated series over `range`
    pub fn snapshot(&self, series: ActivitySeries, range: DateRange) -> CalendarSnapshot {
        let grid = self.engine.build(&series, range, self.config.week_start);
        let labels = LabelPlan::build(&grid, self.config.min_label_spacing);
        let summary = ActivityAggregator::summarize(&series, range);

        debug!(
            weeks = grid.weeks.len(),
            month_labels = labels.month_labels.len(),
            total = summary.total_commits,
            "calendar snapshot ready"
        );

        CalendarSnapshot {
            series,
            grid,
            labels,
            summary,
        }
    }

    pub fn render_svg(&self, snapshot: &CalendarSnapshot) -> Result<String, CalendarError> {
        SvgRenderer::from_config(&self.config).render(&snapshot.grid, &snapshot.labels)
    }

    pub fn render_text(
        &self,
        snapshot: &CalendarSnapshot,
        colored: bool,
    ) -> Result<String, CalendarError> {
        TextRenderer::from_config(&self.config)
            .colored(colored)
            .render(&snapshot.grid, &snapshot.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeekStart;

    fn sample_events_json() -> &'static str {
        r#"[
            {"timestamp": "2024-01-01T09:00:00Z", "sha": "a1", "repository": "acme/api"},
            {"timestamp": "2024-01-01T17:30:00Z", "sha": "a2", "repository": "acme/api"},
            {"timestamp": "2024-01-02T11:00:00+02:00", "sha": "a3"},
            {"timestamp": "2024-01-04T08:00:00Z", "sha": "a4"},
            {"timestamp": "not-a-date", "sha": "a5"}
        ]"#
    }

    fn range() -> DateRange {
        DateRange::parse("2024-01-01", "2024-01-04").unwrap()
    }

    #[test]
    fn test_events_to_summary_json() {
        let json = events_to_summary_json(sample_events_json(), Some(range())).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(summary["totalCommits"], 4);
        assert_eq!(summary["activeDays"], 3);
        assert_eq!(summary["longestStreak"], 2);
        assert_eq!(summary["currentStreak"], 1);
        assert_eq!(summary["averageCommitsPerDay"], 1.0);
        assert_eq!(summary["mostActiveDay"]["date"], "2024-01-01");
        assert_eq!(summary["mostActiveDay"]["count"], 2);
    }

    #[test]
    fn test_events_to_svg() {
        let svg = events_to_svg(sample_events_json(), Some(range())).unwrap();
        assert!(svg.contains("2 contributions on 2024-01-01"));
        assert!(svg.contains("1 contribution on 2024-01-04"));
        assert!(svg.contains("No contributions on 2024-01-03"));
    }

    #[test]
    fn test_summary_skips_non_string_timestamps() {
        let json = events_to_summary_json(
            r#"[{"timestamp":"2024-01-02T09:00:00Z"},{"timestamp":1700000000},{"timestamp":true}]"#,
            Some(range()),
        )
        .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(summary["totalCommits"], 1);
        assert_eq!(summary["mostActiveDay"]["date"], "2024-01-02");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            events_to_svg("not valid json", Some(range())),
            Err(CalendarError::JsonError(_))
        ));
    }

    #[test]
    fn test_empty_events() {
        let processor = CalendarProcessor::new();
        let snapshot = processor.process_events(&[], range());

        assert!(snapshot.series.is_empty());
        assert_eq!(snapshot.summary, ActivitySummary::default());
        assert_eq!(snapshot.grid.in_range_cells().count(), 4);
        assert!(processor.render_svg(&snapshot).is_ok());
    }

    #[test]
    fn test_processor_uses_config() {
        let config = CalendarConfig {
            week_start: WeekStart::Monday,
            ..Default::default()
        };
        let processor = CalendarProcessor::with_config(config).unwrap();
        let snapshot = processor.process_events(&[], range());

        // 2024-01-01 is a Monday, so the range fits in one column
        assert_eq!(snapshot.grid.weeks.len(), 1);
        assert_eq!(snapshot.labels.day_labels[0].text, "Tue");
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let mut config = CalendarConfig::default();
        config.metrics.cell_size = -1.0;
        assert!(CalendarProcessor::with_config(config).is_err());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let processor = CalendarProcessor::new();
        let events = EventAdapter::parse_array(sample_events_json()).unwrap();
        let snapshot = processor.process_events(&events, range());
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["grid"]["weekStart"], 0);
        assert_eq!(json["grid"]["weeks"][0]["days"][1]["date"], "2024-01-01");
        assert_eq!(json["grid"]["weeks"][0]["days"][1]["intensityLevel"], 4);
        assert_eq!(json["grid"]["weeks"][0]["days"][0]["inRange"], false);
        assert_eq!(json["labels"]["dayLabels"][0]["rowIndex"], 1);
        assert_eq!(json["summary"]["totalCommits"], 4);
    }
}
