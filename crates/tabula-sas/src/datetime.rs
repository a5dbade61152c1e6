//! Date/time conversion.
//!
//! SAS measures dates in days and times/timestamps in seconds since
//! 1960-01-01T00:00:00. The accepted window (±999,999,999 and years
//! 1..=9999) matches what other SAS7BDAT readers produce, so extractions stay
//! comparable across tools.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::DateConversionError;

const MIN_COUNT: i64 = -999_999_999;
const MAX_COUNT: i64 = 999_999_999;
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Day 0 of SAS date counts.
pub const EPOCH_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1960, 1, 1) {
    Some(date) => date,
    None => panic!("1960-01-01 is a valid date"),
};

/// The SAS epoch, 1960-01-01T00:00:00.
pub fn epoch() -> NaiveDateTime {
    EPOCH_DATE.and_time(NaiveTime::MIN)
}

fn check_count(unit: &'static str, value: i64) -> Result<(), DateConversionError> {
    if !(MIN_COUNT..=MAX_COUNT).contains(&value) {
        return Err(DateConversionError::CountOutOfRange {
            unit,
            value,
            min: MIN_COUNT,
            max: MAX_COUNT,
        });
    }
    Ok(())
}

fn check_year(year: i32) -> Result<(), DateConversionError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DateConversionError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        });
    }
    Ok(())
}

fn plus_seconds(unit: &'static str, seconds: i64) -> Result<NaiveDateTime, DateConversionError> {
    Duration::try_seconds(seconds)
        .and_then(|d| epoch().checked_add_signed(d))
        .ok_or(DateConversionError::Overflow {
            unit,
            value: seconds,
        })
}

/// Convert a day count to a calendar date.
pub fn day_count_to_date(days: i64) -> Result<NaiveDate, DateConversionError> {
    check_count("days", days)?;
    let date = Duration::try_days(days)
        .and_then(|d| EPOCH_DATE.checked_add_signed(d))
        .ok_or(DateConversionError::Overflow {
            unit: "days",
            value: days,
        })?;
    check_year(date.year())?;
    Ok(date)
}

/// Convert a second count to a full timestamp.
///
/// Only the calendar type's own range applies.
pub fn second_count_to_datetime(seconds: i64) -> Result<NaiveDateTime, DateConversionError> {
    plus_seconds("seconds", seconds)
}

/// Convert a second count to its time of day.
///
/// The count is checked against the same window as a day count, and the
/// resulting timestamp's year must be in range, before the date part is
/// dropped.
pub fn second_count_to_time_of_day(seconds: i64) -> Result<NaiveTime, DateConversionError> {
    check_count("seconds", seconds)?;
    let dt = plus_seconds("seconds", seconds)?;
    check_year(dt.year())?;
    NaiveTime::from_hms_milli_opt(
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.nanosecond() / 1_000_000,
    )
    .ok_or(DateConversionError::Overflow {
        unit: "seconds",
        value: seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_zero_is_epoch() {
        assert_eq!(day_count_to_date(0).unwrap(), ymd(1960, 1, 1));
        assert_eq!(day_count_to_date(1).unwrap(), ymd(1960, 1, 2));
        assert_eq!(day_count_to_date(-1).unwrap(), ymd(1959, 12, 31));
        assert_eq!(day_count_to_date(18_628).unwrap(), ymd(2011, 1, 1));
    }

    #[test]
    fn test_day_count_bounds() {
        // The count window admits these; the year window then rejects them.
        for days in [999_999_999, -999_999_999] {
            let err = day_count_to_date(days).unwrap_err();
            assert!(!matches!(err, DateConversionError::CountOutOfRange { .. }));
        }

        for days in [1_000_000_000, -1_000_000_000] {
            assert_eq!(
                day_count_to_date(days),
                Err(DateConversionError::CountOutOfRange {
                    unit: "days",
                    value: days,
                    min: -999_999_999,
                    max: 999_999_999,
                })
            );
        }
    }

    #[test]
    fn test_day_count_year_window() {
        // 9999-12-31 is the last accepted date
        let last = (ymd(9999, 12, 31) - ymd(1960, 1, 1)).num_days();
        assert_eq!(day_count_to_date(last).unwrap(), ymd(9999, 12, 31));
        assert!(matches!(
            day_count_to_date(last + 1),
            Err(DateConversionError::YearOutOfRange { year: 10000, .. })
        ));

        let first = (ymd(1, 1, 1) - ymd(1960, 1, 1)).num_days();
        assert_eq!(day_count_to_date(first).unwrap(), ymd(1, 1, 1));
        assert!(day_count_to_date(first - 1).is_err());
    }

    #[test]
    fn test_second_count_to_datetime() {
        let dt = second_count_to_datetime(86_400 + 3_661).unwrap();
        assert_eq!(dt, ymd(1960, 1, 2).and_hms_opt(1, 1, 1).unwrap());

        // Seconds far past the day-count window still convert
        let dt = second_count_to_datetime(1_600_000_000).unwrap();
        assert_eq!(dt.date(), ymd(2010, 9, 13));
    }

    #[test]
    fn test_second_count_to_time_of_day() {
        let t = second_count_to_time_of_day(13 * 3600 + 5 * 60 + 9).unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(13, 5, 9).unwrap());

        // Whole days are discarded
        let t = second_count_to_time_of_day(3 * 86_400 + 60).unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(0, 1, 0).unwrap());

        let t = second_count_to_time_of_day(-1).unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn test_epoch() {
        assert_eq!(epoch(), ymd(1960, 1, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(epoch().date(), EPOCH_DATE);
    }

    #[test]
    fn test_time_of_day_reuses_day_window() {
        for seconds in [999_999_999, -999_999_999] {
            assert!(second_count_to_time_of_day(seconds).is_ok());
        }
        for seconds in [1_000_000_000, -1_000_000_000] {
            assert!(matches!(
                second_count_to_time_of_day(seconds),
                Err(DateConversionError::CountOutOfRange { unit: "seconds", value, .. }) if value == seconds
            ));
        }
    }

    #[test]
    fn test_error_messages() {
        let err = day_count_to_date(1_000_000_000).unwrap_err();
        assert_eq!(
            err.to_string(),
            "days=1000000000 must fall within the range [-999999999, 999999999]"
        );
    }
}
