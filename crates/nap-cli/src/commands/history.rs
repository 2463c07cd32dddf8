//! History command for listing recorded sleep.
//!
//! Reads the current snapshot of the live listing, so rows come out most
//! recent first.

use std::io::Write;

use anyhow::Result;
use nap_core::{SessionService, SleepSession, format_minutes};

pub fn run<W: Write>(writer: &mut W, service: &SessionService, json: bool) -> Result<()> {
    let sessions = service.observe_all_sessions().current();
    if json {
        serde_json::to_writer_pretty(&mut *writer, &sessions)?;
        writeln!(writer)?;
        return Ok(());
    }
    write_history(writer, &sessions)
}

/// Format sessions for human-readable output.
pub fn write_history<W: Write>(writer: &mut W, sessions: &[SleepSession]) -> Result<()> {
    writeln!(writer, "SLEEP HISTORY")?;
    writeln!(writer)?;

    if sessions.is_empty() {
        writeln!(writer, "No sleep recorded yet.")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Hint: Run 'nap timer' to time a sleep or 'nap log' to add one."
        )?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<5}  {:<10}  {:<5}  {:<5}  Duration",
        "ID", "Date", "Start", "End"
    )?;
    writeln!(writer, "─────  ──────────  ─────  ─────  ────────")?;

    for session in sessions {
        let id = session
            .id()
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        writeln!(
            writer,
            "{:<5}  {:<10}  {:<5}  {:<5}  {}",
            id,
            session.start_time().format("%Y-%m-%d"),
            session.start_time().format("%H:%M"),
            session.end_time().format("%H:%M"),
            format_minutes(session.duration_minutes())
        )?;
    }

    Ok(())
}
