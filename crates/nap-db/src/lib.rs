//! Storage layer for the sleep log.
//!
//! Provides a [`SessionStore`] backed by `rusqlite`.
//!
//! # Thread Safety
//!
//! A `rusqlite::Connection` is `Send` but not `Sync`, so [`Database`] keeps its
//! connections behind `Mutex`es. Writes hold the writer lock for their whole
//! duration, which serializes them the same way SQLite's own write lock
//! would. A file-backed database also opens a read-only connection for point
//! lookups; in WAL mode those read the last committed state without waiting
//! on an in-flight write. Share a `Database` between threads with an `Arc`.
//!
//! Each write runs inside a transaction that also re-reads the ordered
//! listing. The listing is published to subscribers only after the commit,
//! and still under the lock, so subscribers see listings in write order and
//! never a half-applied write. Rows whose timestamps cannot be parsed are
//! left out of the listing with a warning, so one corrupt record does not
//! block writes to the others; looking it up by id still reports the error.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are local wall-clock times stored as TEXT in the fixed-width
//! format `2024-01-15T22:30:00.000000000`. The fixed width keeps lexicographic
//! ordering identical to chronological ordering and round-trips nanoseconds.
//!
//! ## Ids
//!
//! `id` is `INTEGER PRIMARY KEY AUTOINCREMENT`, so ids of deleted sessions are
//! never handed out again.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction, params};
use tracing::{debug, warn};

use nap_core::{FeedPublisher, SessionFeed, SessionId, SessionStore, SleepSession, StoreError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// SQLite-backed session store.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Mutex<Connection>,
    reader: Option<Mutex<Connection>>,
    feed: FeedPublisher,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.display(), %journal_mode, "opened session database");
        let mut db = Self::from_connection(conn)?;
        let reader = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        db.reader = Some(Mutex::new(reader));
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init(&conn)?;
        let listing = list_sessions(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            reader: None,
            feed: FeedPublisher::new(listing),
        })
    }

    #[cfg(test)]
    fn list_sessions(&self) -> Result<Vec<SleepSession>, StoreError> {
        let conn = self.lock()?;
        list_sessions(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// The read-only connection when there is one, else the writer.
    fn read_lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        match &self.reader {
            Some(reader) => reader.lock().map_err(|_| StoreError::LockPoisoned),
            None => self.lock(),
        }
    }

    /// Runs `op` in a transaction and republishes the listing if it changed
    /// anything.
    fn write<T>(
        &self,
        op: impl FnOnce(&Transaction<'_>) -> Result<(T, bool), StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let (value, changed) = op(&tx)?;
        if !changed {
            return Ok(value);
        }
        let listing = list_sessions(&tx)?;
        tx.commit()?;
        self.feed.publish(listing);
        Ok(value)
    }
}

impl SessionStore for Database {
    fn insert(&self, session: &SleepSession) -> Result<SessionId, StoreError> {
        let id = self.write(|tx| {
            tx.execute(
                "INSERT INTO sleep_sessions (start_time, end_time, duration_minutes)
                 VALUES (?1, ?2, ?3)",
                params![
                    format_timestamp(session.start_time()),
                    format_timestamp(session.end_time()),
                    session.duration_minutes(),
                ],
            )?;
            Ok((SessionId::new(tx.last_insert_rowid()), true))
        })?;
        debug!(%id, "inserted session");
        Ok(id)
    }

    fn update(&self, session: &SleepSession) -> Result<(), StoreError> {
        let Some(id) = session.id() else {
            debug!("ignoring update of unpersisted session");
            return Ok(());
        };
        let updated = self.write(|tx| {
            let rows = tx.execute(
                "UPDATE sleep_sessions
                 SET start_time = ?1, end_time = ?2, duration_minutes = ?3
                 WHERE id = ?4",
                params![
                    format_timestamp(session.start_time()),
                    format_timestamp(session.end_time()),
                    session.duration_minutes(),
                    id.get(),
                ],
            )?;
            Ok((rows > 0, rows > 0))
        })?;
        debug!(%id, updated, "update session");
        Ok(())
    }

    fn get_by_id(&self, id: SessionId) -> Result<Option<SleepSession>, StoreError> {
        let conn = self.read_lock()?;
        let row = conn
            .query_row(
                "SELECT id, start_time, end_time, duration_minutes
                 FROM sleep_sessions
                 WHERE id = ?1",
                [id.get()],
                read_row,
            )
            .optional()?;
        row.map(SessionRow::into_session).transpose()
    }

    fn delete_by_id(&self, id: SessionId) -> Result<(), StoreError> {
        let deleted = self.write(|tx| {
            let rows = tx.execute("DELETE FROM sleep_sessions WHERE id = ?1", [id.get()])?;
            Ok((rows > 0, rows > 0))
        })?;
        debug!(%id, deleted, "delete session");
        Ok(())
    }

    fn observe_all(&self) -> SessionFeed {
        self.feed.subscribe()
    }
}

/// Initializes the database schema.
///
/// This is idempotent - safe to call on an already-initialized database.
fn init(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        -- start_time/end_time: local wall-clock, '%Y-%m-%dT%H:%M:%S%.9f'
        -- duration_minutes: derived, whole minutes from start_time to end_time
        CREATE TABLE IF NOT EXISTS sleep_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sleep_sessions_start ON sleep_sessions(start_time);
        ",
    )?;
    Ok(())
}

struct SessionRow {
    id: i64,
    start_time: String,
    end_time: String,
    duration_minutes: i64,
}

impl SessionRow {
    fn into_session(self) -> Result<SleepSession, StoreError> {
        let start_time = parse_timestamp(&self.start_time, self.id)?;
        let end_time = parse_timestamp(&self.end_time, self.id)?;
        let session = SleepSession::persisted(SessionId::new(self.id), start_time, end_time);
        if session.duration_minutes() != self.duration_minutes {
            warn!(
                id = self.id,
                stored = self.duration_minutes,
                derived = session.duration_minutes(),
                "stored duration disagrees with timestamps; using derived value"
            );
        }
        Ok(session)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        id: row.get(0)?,
        start_time: row.get(1)?,
        end_time: row.get(2)?,
        duration_minutes: row.get(3)?,
    })
}

fn list_sessions(conn: &Connection) -> Result<Vec<SleepSession>, StoreError> {
    let mut stmt = conn.prepare(
        "
        SELECT id, start_time, end_time, duration_minutes
        FROM sleep_sessions
        ORDER BY start_time DESC, id DESC
        ",
    )?;
    let rows = stmt.query_map([], read_row)?;
    let mut sessions = Vec::new();
    for row in rows {
        match row?.into_session() {
            Ok(session) => sessions.push(session),
            Err(error) => warn!(%error, "leaving unreadable session out of listing"),
        }
    }
    Ok(sessions)
}

fn parse_timestamp(value: &str, id: i64) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_PARSE_FORMAT).map_err(|source| {
        StoreError::TimestampParse {
            id,
            value: value.to_string(),
            source,
        }
    })
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
