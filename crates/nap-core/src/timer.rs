//! The sleep timer state machine.
//!
//! The timer is either idle or running since some start time. Stopping a
//! running timer logs a session through the [`SessionService`]. Nothing about
//! the timer is persisted: a process restart mid-session loses the start time.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::service::{ServiceError, SessionService};
use crate::types::SessionId;

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Idle,
    Running { started_at: NaiveDateTime },
}

impl TimerState {
    pub const fn started_at(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Idle => None,
            Self::Running { started_at } => Some(*started_at),
        }
    }

    /// Time since the start as of `now`; `None` while idle.
    pub fn elapsed_at(&self, now: NaiveDateTime) -> Option<TimeDelta> {
        self.started_at().map(|started_at| now - started_at)
    }
}

/// Drives the idle/running state machine.
///
/// `start` and `stop` are serialized by a transition lock. The state itself
/// sits behind a separate read-write lock, so [`elapsed`](Self::elapsed) and
/// [`current_state`](Self::current_state) never wait on a storage write made
/// by `stop`.
pub struct TimerController {
    service: SessionService,
    clock: Arc<dyn Clock>,
    state: RwLock<TimerState>,
    transition: Mutex<()>,
}

impl TimerController {
    pub fn new(service: SessionService) -> Self {
        Self::with_clock(service, Arc::new(SystemClock))
    }

    pub fn with_clock(service: SessionService, clock: Arc<dyn Clock>) -> Self {
        Self {
            service,
            clock,
            state: RwLock::new(TimerState::Idle),
            transition: Mutex::new(()),
        }
    }

    pub fn current_state(&self) -> TimerState {
        *self.read_state()
    }

    /// Time since the timer started, recomputed on every call.
    pub fn elapsed(&self) -> Option<TimeDelta> {
        self.current_state().elapsed_at(self.clock.now())
    }

    /// Starts the timer at the current time and returns that time.
    ///
    /// Starting an already running timer restarts it; the earlier start is
    /// discarded without logging a session.
    pub fn start(&self) -> NaiveDateTime {
        let _transition = self.transition.lock().unwrap_or_else(PoisonError::into_inner);
        let started_at = self.clock.now();
        let previous = std::mem::replace(
            &mut *self.write_state(),
            TimerState::Running { started_at },
        );
        if let TimerState::Running {
            started_at: discarded,
        } = previous
        {
            warn!(%discarded, %started_at, "timer restarted while running");
        } else {
            info!(%started_at, "timer started");
        }
        started_at
    }

    /// Stops a running timer and logs the finished session.
    ///
    /// Returns `Ok(None)` without doing anything when the timer is idle. When
    /// logging fails the timer keeps running from the same start.
    pub fn stop(&self) -> Result<Option<SessionId>, ServiceError> {
        let _transition = self.transition.lock().unwrap_or_else(PoisonError::into_inner);
        let TimerState::Running { started_at } = self.current_state() else {
            debug!("stop requested while idle");
            return Ok(None);
        };

        let ended_at = self.clock.now();
        let id = self.service.log_session(started_at, ended_at)?;
        *self.write_state() = TimerState::Idle;
        info!(%id, %started_at, %ended_at, "timer stopped");
        Ok(Some(id))
    }

    /// Logs a session with caller-supplied boundaries.
    ///
    /// Independent of the timer: works while running and leaves the state
    /// alone. Callers apply [`roll_over_end`](crate::roll_over_end) first.
    pub fn log_manual_sleep(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Result<SessionId, ServiceError> {
        self.service.log_session(start_time, end_time)
    }

    pub const fn service(&self) -> &SessionService {
        &self.service
    }

    fn read_state(&self) -> RwLockReadGuard<'_, TimerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TimerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
