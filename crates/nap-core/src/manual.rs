//! Boundaries for hand-entered sessions.
//!
//! A manual entry is typed as a date plus clock times. Overnight sleep is
//! usually entered with an end time that reads earlier on the clock than the
//! start (22:00 to 06:30). Such an end is rolled over to the following day
//! before the session is built; [`SleepSession::create`](crate::SleepSession::create)
//! never adjusts anything itself.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Moves `end` to the next calendar day when it falls before `start`.
///
/// The clock time of `end` is kept; only its date advances by one.
pub fn roll_over_end(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    if end >= start {
        return end;
    }
    end.checked_add_days(Days::new(1)).unwrap_or(end)
}

/// Combines dates and clock times into session boundaries, applying rollover.
pub fn manual_bounds(
    start_date: NaiveDate,
    start_time: NaiveTime,
    end_date: NaiveDate,
    end_time: NaiveTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = start_date.and_time(start_time);
    let end = roll_over_end(start, end_date.and_time(end_time));
    (start, end)
}
