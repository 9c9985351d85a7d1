//! Clock-time codec: meeting time strings to minute-of-day integers and back.
//!
//! Accepted time formats (case-insensitive, optional space before the meridiem):
//!
//! - `H` / `HH`: 24-hour hour (`"8"`, `"14"`)
//! - `H:MM`: 24-hour hour and minute (`"8:50"`, `"14:30"`)
//! - `H AM` / `HPM`: 12-hour hour (`"2 PM"`, `"11am"`)
//! - `H:MM AM`: 12-hour hour and minute (`"2:15 PM"`)
//!
//! Nothing is guessed: a string that does not match one of these shapes is a
//! [`ScheduleError::InvalidTime`], never a silently substituted default.

use chrono::{NaiveTime, Timelike};

use crate::error::ScheduleError;
use crate::interval::Interval;

/// Minutes since midnight.
pub type Minute = u16;

/// Minutes in a full day; the exclusive upper bound of any [`Minute`].
pub const MINUTES_PER_DAY: Minute = 24 * 60;

// ── parse_time ──────────────────────────────────────────────────────────────

/// Parse a clock-time string into minutes since midnight.
///
/// `12 AM` is midnight (0), `12 PM` is noon (720), and `1`–`11 PM` add twelve
/// hours. Without a meridiem the hour is read as 24-hour time.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidTime`] if the string does not match an
/// accepted format or names an impossible time (`"25:00"`, `"13 PM"`).
///
/// # Examples
///
/// ```
/// use schedule_engine::clock::parse_time;
///
/// assert_eq!(parse_time("9:00").unwrap(), 540);
/// assert_eq!(parse_time("2:15 pm").unwrap(), 855);
/// assert_eq!(parse_time("12AM").unwrap(), 0);
/// ```
pub fn parse_time(s: &str) -> Result<Minute, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime(format!("'{}'", s.trim()));

    let upper = s.trim().to_ascii_uppercase();
    let (body, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let (hour_str, minute_str) = match body.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (body, None),
    };

    let hour = parse_digits(hour_str, 1..=2).ok_or_else(invalid)?;
    let minute = match minute_str {
        Some(m) => parse_digits(m, 2..=2).ok_or_else(invalid)?,
        None => 0,
    };

    let hour24 = match meridiem {
        None => hour,
        Some(is_pm) => {
            if !(1..=12).contains(&hour) {
                return Err(invalid());
            }
            match (hour, is_pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
    };

    NaiveTime::from_hms_opt(hour24, minute, 0)
        .map(|t| minute_of(&t))
        .ok_or_else(invalid)
}

/// Parse an ASCII digit run whose length falls in `len`.
fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ── parse_range ─────────────────────────────────────────────────────────────

/// Parse a `start-end` time range such as `"8:00-8:50"` or `"2:00 PM - 3:15 PM"`.
///
/// The string must contain exactly one `-`. Ranges that end at or before
/// their start are rejected, so meetings that cross midnight are not
/// representable.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidRange`] for a missing or repeated separator
/// or a non-positive span, and [`ScheduleError::InvalidTime`] if either side
/// fails [`parse_time`].
pub fn parse_range(s: &str) -> Result<Interval, ScheduleError> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 2 {
        return Err(ScheduleError::InvalidRange(format!(
            "expected exactly one '-' in '{}'",
            s.trim()
        )));
    }

    let start = parse_time(parts[0])?;
    let end = parse_time(parts[1])?;

    Interval::new(start, end).ok_or_else(|| {
        ScheduleError::InvalidRange(format!("end is not after start in '{}'", s.trim()))
    })
}

// ── formatting ──────────────────────────────────────────────────────────────

/// Render a minute-of-day as 12-hour `H:MM AM/PM`.
///
/// Values of a full day or more wrap, so the window end `1440` renders as
/// `"12:00 AM"`.
pub fn format_time(minute: Minute) -> String {
    let minute = minute % MINUTES_PER_DAY;
    let hour24 = minute / 60;
    let (hour12, suffix) = match hour24 {
        0 => (12, "AM"),
        1..=11 => (hour24, "AM"),
        12 => (12, "PM"),
        _ => (hour24 - 12, "PM"),
    };
    format!("{}:{:02} {}", hour12, minute % 60, suffix)
}

/// Render an interval as `"9:00 AM - 9:50 AM"`.
pub fn format_range(interval: Interval) -> String {
    format!(
        "{} - {}",
        format_time(interval.start),
        format_time(interval.end)
    )
}

/// Minute-of-day for a wall-clock time, dropping seconds.
pub fn minute_of(time: &NaiveTime) -> Minute {
    // hour() < 24 and minute() < 60, so this always fits.
    (time.hour() * 60 + time.minute()) as Minute
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_time tests ────────────────────────────────────────────────

    #[test]
    fn test_parse_bare_hour() {
        assert_eq!(parse_time("8").unwrap(), 480);
        assert_eq!(parse_time("14").unwrap(), 840);
    }

    #[test]
    fn test_parse_hour_minute() {
        assert_eq!(parse_time("8:50").unwrap(), 530);
        assert_eq!(parse_time("23:59").unwrap(), 1439);
        assert_eq!(parse_time("0:00").unwrap(), 0);
    }

    #[test]
    fn test_parse_meridiem_variants() {
        assert_eq!(parse_time("2 PM").unwrap(), 840);
        assert_eq!(parse_time("2pm").unwrap(), 840);
        assert_eq!(parse_time("2:15 Pm").unwrap(), 855);
        assert_eq!(parse_time("11:30am").unwrap(), 690);
    }

    #[test]
    fn test_parse_twelve_oclock_edge_cases() {
        assert_eq!(parse_time("12 AM").unwrap(), 0);
        assert_eq!(parse_time("12:30 AM").unwrap(), 30);
        assert_eq!(parse_time("12 PM").unwrap(), 720);
        assert_eq!(parse_time("12:45 PM").unwrap(), 765);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        assert_eq!(parse_time("  9:00  ").unwrap(), 540);
        assert_eq!(parse_time(" 8:50 PM").unwrap(), 1250);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "noon", "9:0", "9:000", "25:00", "9:60", "13 PM", "0 AM", "9.30", "-1"] {
            assert!(
                matches!(parse_time(bad), Err(ScheduleError::InvalidTime(_))),
                "expected InvalidTime for {bad:?}"
            );
        }
    }

    // ── parse_range tests ───────────────────────────────────────────────

    #[test]
    fn test_range_24_hour() {
        let r = parse_range("8:00-8:50").unwrap();
        assert_eq!((r.start, r.end), (480, 530));
    }

    #[test]
    fn test_range_with_meridiem_and_spaces() {
        let r = parse_range("8:00 AM - 8:50 PM").unwrap();
        assert_eq!((r.start, r.end), (480, 1250));
    }

    #[test]
    fn test_range_without_dash() {
        assert!(matches!(
            parse_range("9:00"),
            Err(ScheduleError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_range_with_two_dashes() {
        assert!(matches!(
            parse_range("9:00-9:50-10:00"),
            Err(ScheduleError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_range_overnight_rejected() {
        assert!(matches!(
            parse_range("11:00 PM - 1:00 AM"),
            Err(ScheduleError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_range_zero_length_rejected() {
        assert!(matches!(
            parse_range("9:00-9:00"),
            Err(ScheduleError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_range_bad_side_is_invalid_time() {
        assert!(matches!(
            parse_range("9:00-later"),
            Err(ScheduleError::InvalidTime(_))
        ));
    }

    // ── formatting tests ────────────────────────────────────────────────

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "12:00 AM");
        assert_eq!(format_time(540), "9:00 AM");
        assert_eq!(format_time(720), "12:00 PM");
        assert_eq!(format_time(915), "3:15 PM");
        assert_eq!(format_time(1380), "11:00 PM");
        assert_eq!(format_time(1440), "12:00 AM");
    }

    #[test]
    fn test_format_parses_back() {
        for m in [0, 59, 360, 719, 720, 721, 1439] {
            assert_eq!(parse_time(&format_time(m)).unwrap(), m);
        }
    }

    #[test]
    fn test_format_range() {
        let r = Interval::new(840, 915).unwrap();
        assert_eq!(format_range(r), "2:00 PM - 3:15 PM");
    }

    #[test]
    fn test_minute_of_drops_seconds() {
        let t = NaiveTime::from_hms_opt(13, 20, 59).unwrap();
        assert_eq!(minute_of(&t), 800);
    }
}
