//! Month and weekday label placement

use crate::types::{DayLabel, GridLayout, LabelPlan, MonthLabel, WeekStart};
use chrono::Datelike;
use tracing::debug;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Indexed by weekday number, 0 = Sunday
const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Only every other row is labelled
const LABELLED_ROWS: [usize; 3] = [1, 3, 5];

/// Decides which grid columns and rows get a label
pub struct LabelPlacer;

impl LabelPlacer {
    /// Label each column whose first day starts a new month.
    ///
    /// Greedy left-to-right scan: a new month closer than `min_spacing_units` to
    /// the last emitted label is dropped, and the last emitted label stays the
    /// reference for the next one.
    pub fn month_labels(grid: &GridLayout, min_spacing_units: f64) -> Vec<MonthLabel> {
        let pitch = grid.geometry.column_pitch;
        let mut labels: Vec<MonthLabel> = Vec::new();
        let mut current_month: Option<(i32, u32)> = None;
        let mut skipped = 0usize;

        for (week_index, week) in grid.weeks.iter().enumerate() {
            let first = week.first_day();
            let month = (first.year(), first.month());
            if current_month == Some(month) {
                continue;
            }
            current_month = Some(month);

            if let Some(last) = labels.last() {
                let distance = (week_index - last.week_index) as f64 * pitch;
                if distance < min_spacing_units {
                    skipped += 1;
                    continue;
                }
            }

            labels.push(MonthLabel {
                week_index,
                text: MONTH_NAMES[first.month0() as usize].to_string(),
            });
        }

        if skipped > 0 {
            debug!(skipped, emitted = labels.len(), "month labels dropped by spacing");
        }
        labels
    }

    /// Labels for rows 1, 3 and 5, named relative to `week_start`
    pub fn day_labels(week_start: WeekStart) -> Vec<DayLabel> {
        LABELLED_ROWS
            .iter()
            .map(|&row_index| DayLabel {
                row_index,
                text: WEEKDAY_NAMES[(row_index + week_start.as_u8() as usize) % 7].to_string(),
            })
            .collect()
    }
}

impl LabelPlan {
    /// Run both label passes over `grid`
    pub fn build(grid: &GridLayout, min_spacing_units: f64) -> Self {
        Self {
            month_labels: LabelPlacer::month_labels(grid, min_spacing_units),
            day_labels: LabelPlacer::day_labels(grid.week_start),
        }
    }
}
