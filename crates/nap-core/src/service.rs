//! The session service: the front end's single entry point.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::session::SleepSession;
use crate::store::{SessionFeed, SessionStore, StoreError};
use crate::types::SessionId;

/// Service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage failed; passed through untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The session does not end after it starts (strict mode only).
    #[error("session must end after it starts (start {start}, end {end})")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Whether sessions ending at or before their start are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Store whatever was given, including zero and negative durations.
    #[default]
    Permissive,
    /// Reject ranges where the end is not strictly after the start.
    Strict,
}

impl RangePolicy {
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Permissive }
    }
}

/// Turns raw time boundaries into sessions and relays them to a store.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    range_policy: RangePolicy,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            range_policy: RangePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_range_policy(mut self, range_policy: RangePolicy) -> Self {
        self.range_policy = range_policy;
        self
    }

    pub const fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    /// Builds a session from its boundaries and persists it.
    pub fn log_session(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Result<SessionId, ServiceError> {
        let session = SleepSession::create(start_time, end_time);
        self.check_range(&session)?;
        let id = self.store.insert(&session)?;
        debug!(%id, %start_time, %end_time, "logged session");
        Ok(id)
    }

    pub fn get_session(&self, id: SessionId) -> Result<Option<SleepSession>, ServiceError> {
        Ok(self.store.get_by_id(id)?)
    }

    /// Replaces a stored session; build the new value with
    /// [`SleepSession::with_times`].
    pub fn update_session(&self, session: &SleepSession) -> Result<(), ServiceError> {
        self.check_range(session)?;
        Ok(self.store.update(session)?)
    }

    pub fn delete_session(&self, session: &SleepSession) -> Result<(), ServiceError> {
        Ok(self.store.delete(session)?)
    }

    pub fn delete_session_by_id(&self, id: SessionId) -> Result<(), ServiceError> {
        Ok(self.store.delete_by_id(id)?)
    }

    pub fn observe_all_sessions(&self) -> SessionFeed {
        self.store.observe_all()
    }

    fn check_range(&self, session: &SleepSession) -> Result<(), ServiceError> {
        if self.range_policy == RangePolicy::Strict && !session.has_positive_span() {
            return Err(ServiceError::InvalidRange {
                start: session.start_time(),
                end: session.end_time(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::{MemoryStore, at};

    fn service() -> (Arc<MemoryStore>, SessionService) {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::new(store.clone());
        (store, service)
    }

    #[test]
    fn log_session_persists_with_computed_duration() {
        let (_store, service) = service();

        let id = service.log_session(at(1, 22, 0), at(2, 6, 30)).unwrap();

        let stored = service.get_session(id).unwrap().expect("stored");
        assert_eq!(stored.id(), Some(id));
        assert_eq!(stored.start_time(), at(1, 22, 0));
        assert_eq!(stored.end_time(), at(2, 6, 30));
        assert_eq!(stored.duration_minutes(), 510);
    }

    #[test]
    fn get_session_returns_none_for_unknown_id() {
        let (_store, service) = service();
        assert!(service.get_session(SessionId::new(99)).unwrap().is_none());
    }

    #[test]
    fn permissive_policy_stores_inverted_range() {
        let (store, service) = service();

        let id = service.log_session(at(1, 7, 0), at(1, 6, 30)).unwrap();

        assert_eq!(store.len(), 1);
        let stored = service.get_session(id).unwrap().unwrap();
        assert_eq!(stored.duration_minutes(), -30);
    }

    #[test]
    fn strict_policy_rejects_non_positive_range() {
        let (store, service) = service();
        let service = service.with_range_policy(RangePolicy::Strict);

        let err = service.log_session(at(1, 6, 30), at(1, 6, 30)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRange { .. }));
        assert_eq!(store.len(), 0);

        service.log_session(at(1, 6, 30), at(1, 6, 31)).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn strict_policy_rejects_inverted_update() {
        let (_store, service) = service();
        let service = service.with_range_policy(RangePolicy::Strict);
        let id = service.log_session(at(1, 22, 0), at(2, 6, 30)).unwrap();
        let stored = service.get_session(id).unwrap().unwrap();

        let edited = stored.with_times(at(2, 6, 30), at(1, 22, 0));
        assert!(service.update_session(&edited).is_err());
        assert_eq!(service.get_session(id).unwrap().unwrap(), stored);
    }

    #[test]
    fn update_session_replaces_whole_record() {
        let (_store, service) = service();
        let id = service.log_session(at(1, 22, 0), at(2, 6, 30)).unwrap();
        let stored = service.get_session(id).unwrap().unwrap();

        service
            .update_session(&stored.with_times(at(1, 21, 0), at(2, 7, 0)))
            .unwrap();

        let updated = service.get_session(id).unwrap().unwrap();
        assert_eq!(updated.start_time(), at(1, 21, 0));
        assert_eq!(updated.duration_minutes(), 600);
    }

    #[test]
    fn deletes_by_entity_and_by_id() {
        let (store, service) = service();
        let first = service.log_session(at(1, 22, 0), at(2, 6, 30)).unwrap();
        let second = service.log_session(at(2, 22, 0), at(3, 6, 0)).unwrap();

        let session = service.get_session(first).unwrap().unwrap();
        service.delete_session(&session).unwrap();
        service.delete_session_by_id(second).unwrap();
        service.delete_session_by_id(SessionId::new(42)).unwrap();

        assert_eq!(store.len(), 0);
    }

    #[test]
    fn storage_errors_pass_through() {
        let (store, service) = service();
        store.fail_writes(true);

        let err = service.log_session(at(1, 22, 0), at(2, 6, 30)).unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Sqlite(_))));
    }

    #[test]
    fn observe_all_sessions_lists_most_recent_first() {
        let (_store, service) = service();
        let feed = service.observe_all_sessions();

        service.log_session(at(1, 22, 0), at(2, 6, 0)).unwrap();
        service.log_session(at(3, 22, 0), at(4, 6, 0)).unwrap();
        service.log_session(at(2, 22, 0), at(3, 6, 0)).unwrap();

        let starts: Vec<_> = feed.current().iter().map(SleepSession::start_time).collect();
        assert_eq!(starts, vec![at(3, 22, 0), at(2, 22, 0), at(1, 22, 0)]);
    }
}
