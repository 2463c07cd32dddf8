//! Delete command for removing a recorded sleep.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use nap_core::{SessionId, SessionService};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Session ID (see `nap history`).
    pub id: SessionId,
}

/// Deleting an unknown id succeeds without changing anything.
pub fn run<W: Write>(writer: &mut W, args: &DeleteArgs, service: &SessionService) -> Result<()> {
    service.delete_session_by_id(args.id)?;
    writeln!(writer, "Deleted session {}", args.id)?;
    Ok(())
}
