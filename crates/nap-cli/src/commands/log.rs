//! Log command for recording a past sleep by hand.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use nap_core::{TimerController, manual_bounds};

use super::util::{describe, parse_clock_time, parse_date};

#[derive(Debug, Args)]
pub struct LogArgs {
    /// When the sleep started (HH:MM).
    #[arg(long, value_parser = parse_clock_time)]
    pub start: NaiveTime,

    /// When the sleep ended (HH:MM). An end earlier than the start is taken
    /// to be on the following day.
    #[arg(long, value_parser = parse_clock_time)]
    pub end: NaiveTime,

    /// Date the sleep started (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Date the sleep ended (YYYY-MM-DD). Defaults to the start date.
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &LogArgs,
    timer: &TimerController,
    today: NaiveDate,
) -> Result<()> {
    let start_date = args.date.unwrap_or(today);
    let end_date = args.end_date.unwrap_or(start_date);
    let (start, end) = manual_bounds(start_date, args.start, end_date, args.end);

    let id = timer
        .log_manual_sleep(start, end)
        .context("failed to log sleep")?;
    let session = timer
        .service()
        .get_session(id)?
        .context("logged session vanished")?;

    writeln!(writer, "Logged session {id}: {}", describe(&session))?;
    Ok(())
}
