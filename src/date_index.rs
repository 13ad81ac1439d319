//! Calendar date arithmetic
//!
//! All dates are timezone-free calendar days (`NaiveDate`). Anything carrying a
//! time of day is reduced to its UTC date before it reaches this module, so the
//! grid never drifts across a timezone boundary.

use crate::error::CalendarError;
use crate::types::{DateRange, WeekStart};
use chrono::{Datelike, Days, NaiveDate};

/// Canonical serialization format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pure date helpers used by the aggregator and the grid builder
pub struct DateIndex;

impl DateIndex {
    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// Rejects other shapes (`2024-1-5`, `+2024-01-05`, trailing time) as well as
    /// well-formed strings that name no real day (`2024-02-30`).
    pub fn parse(s: &str) -> Result<NaiveDate, CalendarError> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(CalendarError::InvalidDateFormat(s.to_string()));
        }

        // Shape is fixed above, so the slices are ASCII digits.
        let year: i32 = s[0..4]
            .parse()
            .map_err(|_| CalendarError::InvalidDateFormat(s.to_string()))?;
        let month: u32 = s[5..7]
            .parse()
            .map_err(|_| CalendarError::InvalidDateFormat(s.to_string()))?;
        let day: u32 = s[8..10]
            .parse()
            .map_err(|_| CalendarError::InvalidDateFormat(s.to_string()))?;

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| CalendarError::InvalidDateFormat(s.to_string()))
    }

    /// Format a date as `YYYY-MM-DD`
    pub fn format(date: NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Shift a date by `n` days (negative moves backward)
    pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
        let magnitude = Days::new(n.unsigned_abs());
        let shifted = if n >= 0 {
            date.checked_add_days(magnitude)
        } else {
            date.checked_sub_days(magnitude)
        };
        // Only reachable at the edges of chrono's representable range.
        shifted.unwrap_or(if n >= 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        })
    }

    /// Day of week with 0 = Sunday .. 6 = Saturday
    pub fn weekday(date: NaiveDate) -> u8 {
        date.weekday().num_days_from_sunday() as u8
    }

    /// Inclusive, ascending sequence of every date in `range`.
    ///
    /// The returned iterator is lazy; calling this again restarts from `range.start`.
    pub fn enumerate(range: DateRange) -> impl Iterator<Item = NaiveDate> + Clone {
        let end = range.end();
        range.start().iter_days().take_while(move |d| *d <= end)
    }

    /// Latest date `<= date` that falls on `week_start`
    pub fn align_to_week_start(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
        let back = (Self::weekday(date) + 7 - week_start.as_u8()) % 7;
        Self::add_days(date, -i64::from(back))
    }

    /// Signed number of days from `from` to `to`
    pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
        (to - from).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        DateIndex::parse(s).unwrap()
    }

    #[test]
    fn test_parse_valid_date() {
        let d = date("2024-02-29");
        assert_eq!((d.year(), d.month(), d.day()), (2024, 2, 29));
    }

    #[test]
    fn test_parse_rejects_nonexistent_day() {
        assert!(matches!(
            DateIndex::parse("2024-02-30"),
            Err(CalendarError::InvalidDateFormat(_))
        ));
        assert!(DateIndex::parse("2023-02-29").is_err());
        assert!(DateIndex::parse("2024-13-01").is_err());
    }

    #[test]
    fn test_parse_rejects_loose_shapes() {
        for bad in [
            "2024-1-05",
            "2024/01/05",
            "20240105",
            "2024-01-05T00:00:00Z",
            " 2024-01-05",
            "",
            "abcd-ef-gh",
        ] {
            assert!(DateIndex::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_format_parse_round_trip() {
        let start = date("2023-12-25");
        for offset in 0..800 {
            let d = DateIndex::add_days(start, offset);
            assert_eq!(DateIndex::parse(&DateIndex::format(d)).unwrap(), d);
        }
    }

    #[test]
    fn test_add_days_both_directions() {
        let d = date("2024-03-01");
        assert_eq!(DateIndex::add_days(d, -1), date("2024-02-29"));
        assert_eq!(DateIndex::add_days(d, 31), date("2024-04-01"));
        assert_eq!(DateIndex::add_days(d, 0), d);
    }

    #[test]
    fn test_weekday_sunday_is_zero() {
        assert_eq!(DateIndex::weekday(date("2024-06-16")), 0);
        assert_eq!(DateIndex::weekday(date("2024-06-15")), 6);
        assert_eq!(DateIndex::weekday(date("2024-01-01")), 1);
    }

    #[test]
    fn test_enumerate_single_day() {
        let range = DateRange::parse("2024-06-15", "2024-06-15").unwrap();
        let days: Vec<_> = DateIndex::enumerate(range).collect();
        assert_eq!(days, vec![date("2024-06-15")]);
    }

    #[test]
    fn test_enumerate_is_inclusive_and_restartable() {
        let range = DateRange::parse("2024-02-27", "2024-03-02").unwrap();
        let first: Vec<_> = DateIndex::enumerate(range).collect();
        let second: Vec<_> = DateIndex::enumerate(range).collect();
        assert_eq!(first.len(), 5);
        assert_eq!(first.first(), Some(&date("2024-02-27")));
        assert_eq!(first.last(), Some(&date("2024-03-02")));
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_align_to_week_start() {
        // Saturday
        let d = date("2024-06-15");
        assert_eq!(
            DateIndex::align_to_week_start(d, WeekStart::Sunday),
            date("2024-06-09")
        );
        assert_eq!(
            DateIndex::align_to_week_start(d, WeekStart::Monday),
            date("2024-06-10")
        );

        // Already aligned
        let sunday = date("2024-06-16");
        assert_eq!(
            DateIndex::align_to_week_start(sunday, WeekStart::Sunday),
            sunday
        );
    }

    #[test]
    fn test_align_saturates_at_earliest_date() {
        for week_start in [WeekStart::Sunday, WeekStart::Monday] {
            let aligned = DateIndex::align_to_week_start(NaiveDate::MIN, week_start);
            assert_eq!(aligned, NaiveDate::MIN);
        }
    }

    #[test]
    fn test_days_between() {
        assert_eq!(
            DateIndex::days_between(date("2024-01-01"), date("2024-12-31")),
            365
        );
        assert_eq!(
            DateIndex::days_between(date("2024-01-02"), date("2024-01-01")),
            -1
        );
    }

    // Every day from 0000-01-01 through 9999-12-31
    const FOUR_DIGIT_YEAR_DAYS: i64 = 3_652_425;

    proptest! {
        #[test]
        fn prop_format_parse_round_trip(offset in 0..FOUR_DIGIT_YEAR_DAYS) {
            let d = DateIndex::add_days(date("0000-01-01"), offset);
            prop_assert_eq!(DateIndex::parse(&DateIndex::format(d)).unwrap(), d);
        }

        #[test]
        fn prop_align_lands_within_previous_week(
            offset in 0..FOUR_DIGIT_YEAR_DAYS,
            monday in any::<bool>(),
        ) {
            let d = DateIndex::add_days(date("0000-01-01"), offset);
            let week_start = if monday { WeekStart::Monday } else { WeekStart::Sunday };
            let aligned = DateIndex::align_to_week_start(d, week_start);

            prop_assert_eq!(DateIndex::weekday(aligned), week_start.as_u8());
            prop_assert!((0..7).contains(&DateIndex::days_between(aligned, d)));
        }
    }
}
