//! Show command for a single recorded sleep.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use nap_core::{SessionId, SessionService, format_minutes};

use super::util::format_moment;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Session ID (see `nap history`).
    pub id: SessionId,
}

pub fn run<W: Write>(writer: &mut W, args: &ShowArgs, service: &SessionService) -> Result<()> {
    let Some(session) = service.get_session(args.id)? else {
        bail!("session not found: {}", args.id);
    };

    writeln!(writer, "Session:  {}", args.id)?;
    writeln!(writer, "Start:    {}", format_moment(session.start_time()))?;
    writeln!(writer, "End:      {}", format_moment(session.end_time()))?;
    writeln!(
        writer,
        "Duration: {}",
        format_minutes(session.duration_minutes())
    )?;
    Ok(())
}
