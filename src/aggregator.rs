//! Activity aggregation
//!
//! Turns raw commit events into a per-date [`ActivitySeries`], merges series
//! from several sources, and derives the summary statistics shown next to a
//! calendar.

use crate::schema::CommitEvent;
use crate::types::{ActivitySeries, ActivitySummary, DateRange, MostActiveDay};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Aggregator for commit events and activity series
pub struct ActivityAggregator;

impl ActivityAggregator {
    /// Count events per UTC calendar date.
    ///
    /// Events without a usable timestamp are skipped. Dates without events are
    /// not stored.
    pub fn aggregate_by_date(events: &[CommitEvent]) -> ActivitySeries {
        let mut series = ActivitySeries::new();
        let mut skipped = 0usize;

        for event in events {
            match event.utc_date() {
                Some(date) => series.add(date, 1),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, total = events.len(), "dropped events with unusable timestamps");
        }
        debug!(
            accepted = events.len() - skipped,
            days = series.len(),
            "aggregated events by date"
        );

        series
    }

    /// Aggregate several per-query result sets into one series
    pub fn aggregate_result_sets(result_sets: &[Vec<CommitEvent>]) -> ActivitySeries {
        let per_query: Vec<ActivitySeries> = result_sets
            .iter()
            .map(|events| Self::aggregate_by_date(events))
            .collect();
        Self::merge(&per_query)
    }

    /// One series per repository; events without a repository are keyed by `""`
    pub fn aggregate_by_repository(events: &[CommitEvent]) -> BTreeMap<String, ActivitySeries> {
        let mut by_repository: BTreeMap<String, Vec<CommitEvent>> = BTreeMap::new();
        for event in events {
            by_repository
                .entry(event.repository.clone().unwrap_or_default())
                .or_default()
                .push(event.clone());
        }

        by_repository
            .into_iter()
            .map(|(repository, events)| (repository, Self::aggregate_by_date(&events)))
            .filter(|(_, series)| !series.is_empty())
            .collect()
    }

    /// Summing merge: each date's count is the sum over every input mentioning it
    pub fn merge<'a, I>(series_list: I) -> ActivitySeries
    where
        I: IntoIterator<Item = &'a ActivitySeries>,
    {
        let mut merged = ActivitySeries::new();
        for series in series_list {
            for (date, count) in series.iter() {
                merged.add(date, count);
            }
        }
        merged
    }

    /// Summary statistics of `series` restricted to `range`.
    ///
    /// Dates absent from the series count as zero, so gaps break streaks.
    pub fn summarize(series: &ActivitySeries, range: DateRange) -> ActivitySummary {
        let mut total_commits = 0u64;
        let mut active_days = 0u64;
        let mut longest_streak = 0u64;
        let mut run = 0u64;
        let mut day_count = 0u64;
        let mut most_active_day = MostActiveDay::default();

        for date in range.iter() {
            day_count += 1;
            let count = series.get(date);
            total_commits = total_commits.saturating_add(count);

            if count == 0 {
                run = 0;
                continue;
            }

            active_days += 1;
            run += 1;
            longest_streak = longest_streak.max(run);

            // Strictly greater keeps the earliest date on ties
            if count > most_active_day.count {
                most_active_day = MostActiveDay {
                    date: Some(date),
                    count,
                };
            }
        }

        let average_commits_per_day = if day_count == 0 {
            0.0
        } else {
            round_to_tenth(total_commits as f64 / day_count as f64)
        };

        ActivitySummary {
            total_commits,
            active_days,
            longest_streak,
            // The loop ends on range.end, so the open run is the trailing streak
            current_streak: run,
            average_commits_per_day,
            most_active_day,
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
