//! Persistence contract for sleep sessions.
//!
//! The front end never talks to storage directly; it goes through
//! [`SessionService`](crate::SessionService), which delegates to an
//! implementation of [`SessionStore`]. The SQLite implementation lives in the
//! `nap-db` crate.
//!
//! # Live listing
//!
//! [`SessionStore::observe_all`] hands out a [`SessionFeed`]. After every
//! successful write the store publishes the full listing, ordered by start
//! time with the most recent first, to every feed. Publishing happens after
//! the write has committed, so a feed never observes a partially applied
//! write. Feeds hold the latest snapshot only: a subscriber that falls behind
//! skips intermediate listings and sees the newest one.

use thiserror::Error;
use tokio::sync::watch;

use crate::session::SleepSession;
use crate::types::SessionId;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored timestamp could not be parsed.
    #[error("invalid timestamp for session {id}: {value}")]
    TimestampParse {
        id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A thread panicked while holding the connection.
    #[error("session store lock poisoned")]
    LockPoisoned,
}

/// Durable storage for sleep sessions.
///
/// All methods may block on disk I/O. Async callers should run them through
/// `tokio::task::spawn_blocking`.
pub trait SessionStore: Send + Sync {
    /// Persists a new record and returns its freshly assigned id.
    ///
    /// Any id already carried by `session` is ignored.
    fn insert(&self, session: &SleepSession) -> Result<SessionId, StoreError>;

    /// Replaces the whole record matching `session.id()`.
    ///
    /// Silently does nothing when no record matches or the session has no id.
    fn update(&self, session: &SleepSession) -> Result<(), StoreError>;

    /// Point lookup; `None` when no record matches.
    fn get_by_id(&self, id: SessionId) -> Result<Option<SleepSession>, StoreError>;

    /// Removes the record with the given id, if any.
    fn delete_by_id(&self, id: SessionId) -> Result<(), StoreError>;

    /// Removes the record backing `session`, if any.
    fn delete(&self, session: &SleepSession) -> Result<(), StoreError> {
        match session.id() {
            Some(id) => self.delete_by_id(id),
            None => Ok(()),
        }
    }

    /// Subscribes to the live listing of all sessions.
    fn observe_all(&self) -> SessionFeed;
}

/// A subscription to the live session listing.
#[derive(Debug, Clone)]
pub struct SessionFeed {
    rx: watch::Receiver<Vec<SleepSession>>,
}

impl SessionFeed {
    /// The most recently published listing, without waiting.
    pub fn current(&self) -> Vec<SleepSession> {
        self.rx.borrow().clone()
    }

    /// Waits for the next published listing.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Vec<SleepSession>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Whether a listing newer than the last one seen is waiting.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }
}

/// The publishing side of [`SessionFeed`], owned by a store.
#[derive(Debug)]
pub struct FeedPublisher {
    tx: watch::Sender<Vec<SleepSession>>,
}

impl FeedPublisher {
    pub fn new(initial: Vec<SleepSession>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the listing and wakes every subscriber.
    ///
    /// Works with zero subscribers; later subscribers start from this listing.
    pub fn publish(&self, sessions: Vec<SleepSession>) {
        self.tx.send_replace(sessions);
    }

    pub fn subscribe(&self) -> SessionFeed {
        SessionFeed {
            rx: self.tx.subscribe(),
        }
    }
}
