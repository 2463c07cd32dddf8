//! Timer command: times a sleep as it happens.
//!
//! Starts the timer, redraws the elapsed time once per tick and stops when
//! the stop signal fires (Enter on stdin for the real binary). The timer only
//! lives as long as this process.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use nap_core::{TimerController, format_elapsed};

use super::util::describe;

/// Redraw cadence for the elapsed display.
pub const TICK: Duration = Duration::from_secs(1);

/// Fires once a line (or EOF) arrives on stdin.
pub fn stdin_stop_signal() -> Receiver<()> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        let _ = tx.send(());
    });
    rx
}

pub fn run<W: Write>(
    writer: &mut W,
    timer: &TimerController,
    stop: &Receiver<()>,
    tick: Duration,
) -> Result<()> {
    let started_at = timer.start();
    writeln!(
        writer,
        "Timer started at {}. Press Enter to stop.",
        started_at.format("%H:%M:%S")
    )?;

    loop {
        match stop.recv_timeout(tick) {
            Err(RecvTimeoutError::Timeout) => {
                let elapsed = timer.elapsed().unwrap_or_else(TimeDelta::zero);
                write!(writer, "\r{}", format_elapsed(elapsed))?;
                writer.flush()?;
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let id = timer
        .stop()
        .context("failed to log sleep")?
        .context("timer was not running")?;
    let session = timer
        .service()
        .get_session(id)?
        .context("logged session vanished")?;
    writeln!(writer, "\nLogged session {id}: {}", describe(&session))?;
    Ok(())
}
