//! Recorded sleep sessions.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::types::SessionId;

/// One recorded interval of sleep.
///
/// Timestamps are local wall-clock times with no timezone attached. The
/// duration is derived from the two timestamps and is recomputed whenever
/// either of them changes, so fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<SessionId>,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    duration_minutes: i64,
}

impl SleepSession {
    /// Builds an unpersisted session from its two boundaries.
    ///
    /// An `end_time` at or before `start_time` is accepted and yields a zero
    /// or negative duration. Range checking, when wanted, is the service's job.
    #[must_use]
    pub fn create(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            id: None,
            start_time,
            end_time,
            duration_minutes: duration_between(start_time, end_time),
        }
    }

    /// Rebuilds a session that was read back from storage.
    #[must_use]
    pub fn persisted(id: SessionId, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            id: Some(id),
            ..Self::create(start_time, end_time)
        }
    }

    /// Returns a copy with both boundaries replaced, keeping the id.
    ///
    /// This is the only way to edit a session: the whole record is replaced and
    /// the duration recomputed.
    #[must_use]
    pub fn with_times(&self, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            id: self.id,
            ..Self::create(start_time, end_time)
        }
    }

    pub const fn id(&self) -> Option<SessionId> {
        self.id
    }

    pub const fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub const fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    /// Whole minutes between start and end, sub-minute remainder dropped.
    pub const fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    /// True when the session ends strictly after it starts.
    pub fn has_positive_span(&self) -> bool {
        self.end_time > self.start_time
    }
}

/// Floors the span to whole seconds, then truncates the minutes toward zero.
/// A span of -90s is -1 minute and so is -59.5s.
fn duration_between(start_time: NaiveDateTime, end_time: NaiveDateTime) -> i64 {
    let span = end_time - start_time;
    let mut seconds = span.num_seconds();
    if span.subsec_nanos() < 0 {
        seconds -= 1;
    }
    seconds / 60
}
