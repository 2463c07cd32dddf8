//! In-memory test doubles for the store and the clock.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::session::SleepSession;
use crate::store::{FeedPublisher, SessionFeed, SessionStore, StoreError};
use crate::timer::Clock;
use crate::types::SessionId;

/// A non-durable store that can be told to fail writes.
#[derive(Debug)]
pub struct MemoryStore {
    rows: Mutex<(i64, BTreeMap<SessionId, SleepSession>)>,
    feed: FeedPublisher,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new((0, BTreeMap::new())),
            feed: FeedPublisher::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().1.len()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Sqlite(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("database or disk is full".to_string()),
            )));
        }
        Ok(())
    }

    fn publish(&self, rows: &BTreeMap<SessionId, SleepSession>) {
        let mut listing: Vec<SleepSession> = rows.values().cloned().collect();
        listing.sort_by(|a, b| {
            b.start_time()
                .cmp(&a.start_time())
                .then_with(|| b.id().cmp(&a.id()))
        });
        self.feed.publish(listing);
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, session: &SleepSession) -> Result<SessionId, StoreError> {
        self.check_writable()?;
        let mut guard = self.rows.lock().unwrap();
        guard.0 += 1;
        let id = SessionId::new(guard.0);
        guard.1.insert(
            id,
            SleepSession::persisted(id, session.start_time(), session.end_time()),
        );
        self.publish(&guard.1);
        Ok(id)
    }

    fn update(&self, session: &SleepSession) -> Result<(), StoreError> {
        self.check_writable()?;
        let Some(id) = session.id() else {
            return Ok(());
        };
        let mut guard = self.rows.lock().unwrap();
        if let Some(row) = guard.1.get_mut(&id) {
            *row = session.clone();
            self.publish(&guard.1);
        }
        Ok(())
    }

    fn get_by_id(&self, id: SessionId) -> Result<Option<SleepSession>, StoreError> {
        Ok(self.rows.lock().unwrap().1.get(&id).cloned())
    }

    fn delete_by_id(&self, id: SessionId) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut guard = self.rows.lock().unwrap();
        if guard.1.remove(&id).is_some() {
            self.publish(&guard.1);
        }
        Ok(())
    }

    fn observe_all(&self) -> SessionFeed {
        self.feed.subscribe()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
