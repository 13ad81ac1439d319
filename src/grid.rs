//! Week-aligned grid layout
//!
//! Places every day of a date range into a 7-row grid whose columns are weeks.
//! The first column starts on the configured week start at or before the range
//! start; the last column is padded out to a full week after the range end.

use crate::date_index::DateIndex;
use crate::intensity::IntensityBucketer;
use crate::types::{
    ActivitySeries, CellMetrics, DateRange, DayCell, GridGeometry, GridLayout, WeekColumn,
    WeekStart,
};
use tracing::debug;

/// Builds [`GridLayout`]s with a fixed set of cell metrics
#[derive(Debug, Clone, Default)]
pub struct GridLayoutEngine {
    metrics: CellMetrics,
}

impl GridLayoutEngine {
    pub fn new(metrics: CellMetrics) -> Self {
        Self { metrics }
    }

    /// Lay out `range` with counts looked up in `series`.
    ///
    /// Intensities are bucketed against the maximum of the whole series, and
    /// the output depends on nothing but the arguments.
    pub fn build(
        &self,
        series: &ActivitySeries,
        range: DateRange,
        week_start: WeekStart,
    ) -> GridLayout {
        let max_count = series.max_count();
        let grid_start = DateIndex::align_to_week_start(range.start(), week_start);

        let weeks: Vec<WeekColumn> = (0..Self::week_count(range, week_start))
            .map(|week| {
                let week_first = DateIndex::add_days(grid_start, 7 * week as i64);
                let days = std::array::from_fn(|offset| {
                    let date = DateIndex::add_days(week_first, offset as i64);
                    if !range.contains(date) {
                        return DayCell::placeholder(date);
                    }
                    let count = series.get(date);
                    DayCell {
                        date,
                        in_range: true,
                        count: Some(count),
                        intensity_level: Some(IntensityBucketer::bucket(count, max_count)),
                    }
                });
                WeekColumn { days }
            })
            .collect();

        debug!(
            start = %DateIndex::format(range.start()),
            end = %DateIndex::format(range.end()),
            weeks = weeks.len(),
            max_count,
            "built calendar grid"
        );

        GridLayout {
            range,
            week_start,
            max_count,
            geometry: GridGeometry::new(&self.metrics, weeks.len()),
            weeks,
        }
    }

    /// Number of week columns needed to cover `range`
    pub fn week_count(range: DateRange, week_start: WeekStart) -> usize {
        let grid_start = DateIndex::align_to_week_start(range.start(), week_start);
        let span = DateIndex::days_between(grid_start, range.end()) + 1;
        ((span + 6) / 7) as usize
    }
}
