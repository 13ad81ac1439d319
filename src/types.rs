//! Core types for the contribution calendar
//!
//! This module defines the data structures that flow between the stages of the
//! engine: the aggregated activity series, the week-aligned grid handed to a
//! renderer, its label plan, and the summary statistics.

use crate::date_index::DateIndex;
use crate::error::CalendarError;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First weekday of each grid column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Weekday number, 0 = Sunday
    pub fn as_u8(&self) -> u8 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }
}

impl TryFrom<u8> for WeekStart {
    type Error = CalendarError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WeekStart::Sunday),
            1 => Ok(WeekStart::Monday),
            other => Err(CalendarError::InvalidWeekStart(other)),
        }
    }
}

impl From<WeekStart> for u8 {
    fn from(value: WeekStart) -> Self {
        value.as_u8()
    }
}

/// Latest year a `YYYY-MM-DD` date can carry
const MAX_YEAR: i32 = 9999;

/// Inclusive range of calendar dates with `start <= end`.
///
/// Both bounds lie in years `0000..=9999`, so a range always pads out to whole
/// grid weeks without reaching the limits of `NaiveDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    #[serde(with = "iso_date")]
    start: NaiveDate,
    #[serde(with = "iso_date")]
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end` rather than swapping the bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        for date in [start, end] {
            if !(0..=MAX_YEAR).contains(&date.year()) {
                return Err(CalendarError::InvalidDateFormat(DateIndex::format(date)));
            }
        }
        if start > end {
            return Err(CalendarError::InvalidDateRange {
                start: DateIndex::format(start),
                end: DateIndex::format(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Build a range from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, CalendarError> {
        Self::new(DateIndex::parse(start)?, DateIndex::parse(end)?)
    }

    /// The 365 days before `today` through `today`.
    ///
    /// A `today` outside years `0000..=9999` is pulled back to the nearest
    /// supported date.
    pub fn last_365_days(today: NaiveDate) -> Self {
        let first = NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN);
        let last = NaiveDate::from_ymd_opt(MAX_YEAR, 12, 31).unwrap_or(NaiveDate::MAX);
        let end = today.clamp(first, last);
        Self {
            start: DateIndex::add_days(end, -365).max(first),
            end,
        }
    }

    /// Default range resolved against the current UTC date
    pub fn ending_today() -> Self {
        Self::last_365_days(Utc::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the range (always at least 1)
    pub fn num_days(&self) -> u64 {
        DateIndex::days_between(self.start, self.end) as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + Clone {
        DateIndex::enumerate(*self)
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawRange {
            start: String,
            end: String,
        }

        let raw = RawRange::deserialize(deserializer)?;
        DateRange::parse(&raw.start, &raw.end).map_err(serde::de::Error::custom)
    }
}

/// One day of aggregated activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub count: u64,
}

/// Date-to-count mapping where a missing date means zero activity.
///
/// Zero days are never stored; [`ActivitySeries::get`] resolves them at lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ActivityPoint>", into = "Vec<ActivityPoint>")]
pub struct ActivitySeries {
    counts: BTreeMap<NaiveDate, u64>,
}

impl ActivitySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from points, summing counts of repeated dates
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = ActivityPoint>,
    {
        let mut series = Self::new();
        for point in points {
            series.add(point.date, point.count);
        }
        series
    }

    /// Add `count` to `date`, saturating at `u64::MAX`. Adding zero leaves the
    /// series untouched.
    pub fn add(&mut self, date: NaiveDate, count: u64) {
        if count == 0 {
            return;
        }
        let slot = self.counts.entry(date).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Count for `date`, 0 when absent
    pub fn get(&self, date: NaiveDate) -> u64 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    /// Highest count anywhere in the series, 0 when empty
    pub fn max_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Sum of all counts, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0, |acc, c| acc.saturating_add(*c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.counts.iter().map(|(d, c)| (*d, *c))
    }

    pub fn points(&self) -> Vec<ActivityPoint> {
        self.iter()
            .map(|(date, count)| ActivityPoint { date, count })
            .collect()
    }
}

impl From<Vec<ActivityPoint>> for ActivitySeries {
    fn from(points: Vec<ActivityPoint>) -> Self {
        Self::from_points(points)
    }
}

impl From<ActivitySeries> for Vec<ActivityPoint> {
    fn from(series: ActivitySeries) -> Self {
        series.points()
    }
}

/// Discrete shade a day is painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum IntensityLevel {
    Empty,
    Level1,
    Level2,
    Level3,
    Level4,
}

impl IntensityLevel {
    pub const ALL: [IntensityLevel; 5] = [
        IntensityLevel::Empty,
        IntensityLevel::Level1,
        IntensityLevel::Level2,
        IntensityLevel::Level3,
        IntensityLevel::Level4,
    ];

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for IntensityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        IntensityLevel::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("intensity level {value} out of range 0..=4"))
    }
}

impl From<IntensityLevel> for u8 {
    fn from(value: IntensityLevel) -> Self {
        value.as_u8()
    }
}

/// One square of the grid.
///
/// Cells outside the requested range exist only to keep the grid rectangular
/// and carry neither a count nor an intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub in_range: bool,
    pub count: Option<u64>,
    pub intensity_level: Option<IntensityLevel>,
}

impl DayCell {
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            in_range: false,
            count: None,
            intensity_level: None,
        }
    }
}

/// Seven consecutive days starting on the configured week start
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekColumn {
    pub days: [DayCell; 7],
}

impl WeekColumn {
    pub fn first_day(&self) -> NaiveDate {
        self.days[0].date
    }
}

/// Unit sizes used to place cells; a renderer decides what a unit is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellMetrics {
    pub cell_size: f64,
    pub cell_gap: f64,
    /// Space left of the first column, reserved for weekday labels
    pub left_gutter: f64,
    /// Space above the first row, reserved for month labels
    pub top_gutter: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            cell_gap: 2.0,
            left_gutter: 28.0,
            top_gutter: 16.0,
        }
    }
}

/// Geometry derived from the metrics and the number of columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridGeometry {
    pub cell_size: f64,
    pub column_pitch: f64,
    pub row_pitch: f64,
    pub left_gutter: f64,
    pub top_gutter: f64,
    pub width: f64,
    pub height: f64,
}

impl GridGeometry {
    pub fn new(metrics: &CellMetrics, week_count: usize) -> Self {
        let pitch = metrics.cell_size + metrics.cell_gap;
        Self {
            cell_size: metrics.cell_size,
            column_pitch: pitch,
            row_pitch: pitch,
            left_gutter: metrics.left_gutter,
            top_gutter: metrics.top_gutter,
            width: metrics.left_gutter + week_count as f64 * pitch,
            height: metrics.top_gutter + 7.0 * pitch,
        }
    }

    /// Top-left corner of the cell at (`week_index`, `row`)
    pub fn cell_origin(&self, week_index: usize, row: usize) -> (f64, f64) {
        (
            self.left_gutter + week_index as f64 * self.column_pitch,
            self.top_gutter + row as f64 * self.row_pitch,
        )
    }
}

/// Week-aligned grid covering a date range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub range: DateRange,
    pub week_start: WeekStart,
    /// Maximum count of the series the intensities were computed against
    pub max_count: u64,
    pub geometry: GridGeometry,
    pub weeks: Vec<WeekColumn>,
}

impl GridLayout {
    /// In-range cells in date order
    pub fn in_range_cells(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .filter(|c| c.in_range)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLabel {
    pub week_index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLabel {
    pub row_index: usize,
    pub text: String,
}

/// Which columns and rows receive a label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlan {
    pub month_labels: Vec<MonthLabel>,
    pub day_labels: Vec<DayLabel>,
}

/// Busiest day of a series; `date` is `None` when there was no activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostActiveDay {
    #[serde(with = "date_or_empty")]
    pub date: Option<NaiveDate>,
    pub count: u64,
}

/// Statistics over an activity series within a date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_commits: u64,
    pub active_days: u64,
    pub longest_streak: u64,
    pub current_streak: u64,
    pub average_commits_per_day: f64,
    pub most_active_day: MostActiveDay,
}

/// Serde helpers for strict `YYYY-MM-DD` dates
pub(crate) mod iso_date {
    use crate::date_index::DateIndex;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&DateIndex::format(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateIndex::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Like [`iso_date`], but `None` round-trips through the empty string
pub(crate) mod date_or_empty {
    use crate::date_index::DateIndex;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&DateIndex::format(*d)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(None);
        }
        DateIndex::parse(&s)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        DateIndex::parse(s).unwrap()
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        let err = DateRange::parse("2024-01-05", "2024-01-01").unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_date_range_last_365_days() {
        let range = DateRange::last_365_days(date("2024-12-31"));
        assert_eq!(range.start(), date("2024-01-01"));
        assert_eq!(range.num_days(), 366);

        let range = DateRange::last_365_days(date("2023-12-31"));
        assert_eq!(range.start(), date("2022-12-31"));
    }

    #[test]
    fn test_date_range_rejects_dates_beyond_four_digit_years() {
        let near_max = DateIndex::add_days(NaiveDate::MAX, -3);
        assert!(matches!(
            DateRange::new(near_max, NaiveDate::MAX),
            Err(CalendarError::InvalidDateFormat(_))
        ));
        assert!(DateRange::new(NaiveDate::MIN, date("2024-01-01")).is_err());
        assert!(DateRange::parse("0000-01-01", "9999-12-31").is_ok());
    }

    #[test]
    fn test_last_365_days_clamps_extreme_today() {
        let late = DateRange::last_365_days(NaiveDate::MAX);
        assert_eq!(late.end(), date("9999-12-31"));
        assert_eq!(late.num_days(), 366);

        let early = DateRange::last_365_days(NaiveDate::MIN);
        assert_eq!(early.start(), date("0000-01-01"));
        assert_eq!(early.end(), date("0000-01-01"));
    }

    #[test]
    fn test_date_range_deserialize_validates() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).unwrap();
        assert_eq!(ok.num_days(), 31);

        let reversed =
            serde_json::from_str::<DateRange>(r#"{"start":"2024-02-01","end":"2024-01-31"}"#);
        assert!(reversed.is_err());
    }

    #[test]
    fn test_week_start_serde() {
        assert_eq!(serde_json::to_string(&WeekStart::Monday).unwrap(), "1");
        assert_eq!(
            serde_json::from_str::<WeekStart>("0").unwrap(),
            WeekStart::Sunday
        );
        assert!(serde_json::from_str::<WeekStart>("3").is_err());
    }

    #[test]
    fn test_series_lookup_defaults_to_zero() {
        let mut series = ActivitySeries::new();
        series.add(date("2024-01-01"), 3);
        series.add(date("2024-01-03"), 0);

        assert_eq!(series.get(date("2024-01-01")), 3);
        assert_eq!(series.get(date("2024-01-02")), 0);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_series_serializes_as_points() {
        let series = ActivitySeries::from_points([
            ActivityPoint {
                date: date("2024-01-02"),
                count: 1,
            },
            ActivityPoint {
                date: date("2024-01-01"),
                count: 2,
            },
        ]);

        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(
            json,
            r#"[{"date":"2024-01-01","count":2},{"date":"2024-01-02","count":1}]"#
        );
    }

    #[test]
    fn test_series_deserialize_sums_repeated_dates() {
        let series: ActivitySeries = serde_json::from_str(
            r#"[{"date":"2024-01-01","count":2},{"date":"2024-01-01","count":4}]"#,
        )
        .unwrap();
        assert_eq!(series.get(date("2024-01-01")), 6);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_series_counts_saturate() {
        let json = format!(
            r#"[{{"date":"2024-01-01","count":{}}},{{"date":"2024-01-01","count":1}},{{"date":"2024-01-02","count":5}}]"#,
            u64::MAX
        );
        let series: ActivitySeries = serde_json::from_str(&json).unwrap();
        assert_eq!(series.get(date("2024-01-01")), u64::MAX);
        assert_eq!(series.total(), u64::MAX);
    }

    #[test]
    fn test_series_rejects_malformed_dates() {
        let result =
            serde_json::from_str::<ActivitySeries>(r#"[{"date":"2024-02-30","count":1}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_summary_shape() {
        let json = serde_json::to_value(ActivitySummary::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalCommits": 0,
                "activeDays": 0,
                "longestStreak": 0,
                "currentStreak": 0,
                "averageCommitsPerDay": 0.0,
                "mostActiveDay": { "date": "", "count": 0 }
            })
        );
    }

    #[test]
    fn test_geometry_cell_origin() {
        let geometry = GridGeometry::new(&CellMetrics::default(), 53);
        assert_eq!(geometry.cell_origin(0, 0), (28.0, 16.0));
        assert_eq!(geometry.cell_origin(2, 3), (28.0 + 24.0, 16.0 + 36.0));
        assert_eq!(geometry.width, 28.0 + 53.0 * 12.0);
        assert_eq!(geometry.height, 16.0 + 7.0 * 12.0);
    }
}
