//! Human-readable renderings of durations.

use chrono::TimeDelta;

/// Formats a running timer as `HH:MM:SS`.
///
/// Hours are not wrapped at 24, so a 25 hour span renders as `25:00:00`.
/// Negative spans render as zero.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Formats a stored duration in minutes as `8h 30m`.
pub fn format_minutes(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(hours: i64, minutes: i64, seconds: i64) -> TimeDelta {
        TimeDelta::hours(hours) + TimeDelta::minutes(minutes) + TimeDelta::seconds(seconds)
    }

    #[test]
    fn format_elapsed_pads_each_field() {
        assert_eq!(format_elapsed(TimeDelta::zero()), "00:00:00");
        assert_eq!(format_elapsed(span(0, 0, 45)), "00:00:45");
        assert_eq!(format_elapsed(span(0, 1, 0)), "00:01:00");
        assert_eq!(format_elapsed(span(1, 0, 0)), "01:00:00");
        assert_eq!(format_elapsed(span(2, 30, 15)), "02:30:15");
    }

    #[test]
    fn format_elapsed_does_not_wrap_hours() {
        assert_eq!(format_elapsed(span(25, 15, 30)), "25:15:30");
    }

    #[test]
    fn format_elapsed_ignores_sub_second_part() {
        let elapsed = TimeDelta::milliseconds(1_999);
        assert_eq!(format_elapsed(elapsed), "00:00:01");
    }

    #[test]
    fn format_elapsed_clamps_negative_spans() {
        assert_eq!(format_elapsed(TimeDelta::seconds(-5)), "00:00:00");
    }

    #[test]
    fn format_minutes_splits_hours() {
        assert_eq!(format_minutes(510), "8h 30m");
        assert_eq!(format_minutes(45), "0h 45m");
        assert_eq!(format_minutes(1440), "24h 0m");
    }
}
