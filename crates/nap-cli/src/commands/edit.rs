//! Edit command for changing the clock times of a recorded sleep.
//!
//! Only the hour and minute change; each boundary keeps its date. The whole
//! record is replaced and its duration recomputed.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use clap::Args;
use nap_core::{SessionId, SessionService};

use super::util::{describe, parse_clock_time};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Session ID (see `nap history`).
    pub id: SessionId,

    /// New start time (HH:MM).
    #[arg(long, value_parser = parse_clock_time)]
    pub start: Option<NaiveTime>,

    /// New end time (HH:MM).
    #[arg(long, value_parser = parse_clock_time)]
    pub end: Option<NaiveTime>,
}

pub fn run<W: Write>(writer: &mut W, args: &EditArgs, service: &SessionService) -> Result<()> {
    let Some(stored) = service.get_session(args.id)? else {
        bail!("session not found: {}", args.id);
    };

    let start = retime(stored.start_time(), args.start)?;
    let end = retime(stored.end_time(), args.end)?;
    let edited = stored.with_times(start, end);
    if edited.duration_minutes() <= 0 {
        bail!(
            "edited session would last {} minutes; it must end after it starts",
            edited.duration_minutes()
        );
    }

    service
        .update_session(&edited)
        .context("failed to update session")?;
    writeln!(writer, "Updated session {}: {}", args.id, describe(&edited))?;
    Ok(())
}

fn retime(moment: NaiveDateTime, time: Option<NaiveTime>) -> Result<NaiveDateTime> {
    let Some(time) = time else {
        return Ok(moment);
    };
    moment
        .with_hour(time.hour())
        .and_then(|m| m.with_minute(time.minute()))
        .with_context(|| format!("cannot set {moment} to {time}"))
}
