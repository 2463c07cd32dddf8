use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use nap_core::{SessionService, TimerController};
use tracing_subscriber::EnvFilter;

use nap_cli::commands::{delete, edit, history, log, show, timer, util};
use nap_cli::{Cli, Commands, Config};

/// Load config and open the session store.
fn open_service(config_path: Option<&Path>) -> Result<SessionService> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    util::open_service(&config.database_path, config.range_policy())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let service = open_service(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Timer => {
            let controller = TimerController::new(service);
            let stop = timer::stdin_stop_signal();
            timer::run(&mut stdout, &controller, &stop, timer::TICK)?;
        }
        Commands::Log(args) => {
            let controller = TimerController::new(service);
            log::run(&mut stdout, args, &controller, Local::now().date_naive())?;
        }
        Commands::History { json } => history::run(&mut stdout, &service, *json)?,
        Commands::Show(args) => show::run(&mut stdout, args, &service)?,
        Commands::Edit(args) => edit::run(&mut stdout, args, &service)?,
        Commands::Delete(args) => delete::run(&mut stdout, args, &service)?,
    }

    Ok(())
}
