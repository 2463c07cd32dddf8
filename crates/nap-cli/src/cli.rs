//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::delete::DeleteArgs;
use crate::commands::edit::EditArgs;
use crate::commands::log::LogArgs;
use crate::commands::show::ShowArgs;

/// Baby sleep log.
///
/// Times sleep as it happens, records past sleep by hand, and keeps the
/// history on this machine.
#[derive(Debug, Parser)]
#[command(name = "nap", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Time a sleep now; press Enter when the baby wakes.
    Timer,

    /// Record a past sleep.
    Log(LogArgs),

    /// List recorded sleep, most recent first.
    History {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one recorded sleep.
    Show(ShowArgs),

    /// Change the start or end time of a recorded sleep.
    Edit(EditArgs),

    /// Delete a recorded sleep.
    Delete(DeleteArgs),
}
