//! Shared utilities for CLI commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use nap_core::{RangePolicy, SessionService, SleepSession, format_minutes};
use nap_db::Database;

/// Opens the session database at `path` and wires a service over it.
pub fn open_service(path: &Path, range_policy: RangePolicy) -> Result<SessionService> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    let db = Database::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(SessionService::new(Arc::new(db)).with_range_policy(range_policy))
}

/// Parse a clock time typed as `HH:MM`.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| format!("invalid time: {s}. Use 24-hour HH:MM (e.g., 22:30)"))
}

/// Parse a calendar date typed as `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15)"))
}

pub fn format_moment(moment: NaiveDateTime) -> String {
    moment.format("%Y-%m-%d %H:%M").to_string()
}

/// One-line description used after log, edit and timer stop.
pub fn describe(session: &SleepSession) -> String {
    format!(
        "{} to {} ({})",
        format_moment(session.start_time()),
        format_moment(session.end_time()),
        format_minutes(session.duration_minutes())
    )
}

#[cfg(test)]
pub fn memory_service() -> SessionService {
    SessionService::new(Arc::new(Database::open_in_memory().unwrap()))
}
