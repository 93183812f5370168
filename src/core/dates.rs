//! Calendar helpers: strict date parsing and day-of-month clamping.
//!
//! Parsing is deliberately strict. An unparseable date rejects the operation
//! with [`Error::InvalidDate`] instead of silently substituting the current
//! time; callers that want a default for an *absent* date pass `None` and get
//! an explicit one.

use crate::errors::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` calendar date.
///
/// Interface layers turning user-supplied strings (issue dates, reminder
/// dates) into engine arguments convert through here, so bad input is
/// rejected before anything is written.
///
/// # Errors
/// Returns [`Error::InvalidDate`] when the string does not parse.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Parses an RFC 3339 timestamp, also accepting a bare `YYYY-MM-DD` as
/// midnight UTC.
///
/// The string form of transaction and return dates comes through here before
/// the engine sees a value; like [`parse_date`] it rejects rather than
/// defaults.
///
/// # Errors
/// Returns [`Error::InvalidDate`] when neither form parses.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_date(trimmed).map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Number of days in the given month (leap-year aware).
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map_or(28, |last| last.day())
}

/// Clamps a nominal day-of-month into the valid range for `year`/`month`,
/// so "the 31st" means "month end" in shorter months.
#[must_use]
pub fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    day.clamp(1, days_in_month(year, month))
}

/// The date at `day` within `year`/`month`, clamping overlong days to the
/// month's last day. `month` always comes from an existing date here, so the
/// construction cannot actually fail; the fallback keeps the function total.
#[must_use]
pub fn date_at_clamped_day(year: i32, month: u32, day: u32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, clamp_day(year, month, day)).unwrap_or(fallback)
}

/// The month after `year`/`month`, rolling the year forward from December.
#[must_use]
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2025-03-05").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        // Surrounding whitespace is tolerated.
        assert_eq!(parse_date(" 2025-03-05 ").unwrap(), date);
    }

    #[test]
    fn test_parse_date_garbage_rejected() {
        for bad in ["", "not-a-date", "2025-13-01", "05/03/2025"] {
            let err = parse_date(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidDate { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_parse_datetime_rfc3339_and_bare_date() {
        let full = parse_datetime("2025-03-05T10:30:00Z").unwrap();
        assert_eq!(full.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());

        let midnight = parse_datetime("2025-03-05").unwrap();
        assert_eq!(midnight.time(), NaiveTime::MIN);

        assert!(matches!(
            parse_datetime("yesterday-ish").unwrap_err(),
            Error::InvalidDate { .. }
        ));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29); // leap year
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_clamp_day() {
        assert_eq!(clamp_day(2025, 4, 31), 30);
        assert_eq!(clamp_day(2025, 2, 31), 28);
        assert_eq!(clamp_day(2024, 2, 31), 29);
        assert_eq!(clamp_day(2025, 1, 31), 31);
        assert_eq!(clamp_day(2025, 6, 0), 1);
    }

    #[test]
    fn test_next_month_rolls_year() {
        assert_eq!(next_month(2025, 11), (2025, 12));
        assert_eq!(next_month(2025, 12), (2026, 1));
    }
}
