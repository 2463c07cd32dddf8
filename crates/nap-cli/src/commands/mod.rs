//! CLI subcommand implementations.

pub mod delete;
pub mod edit;
pub mod history;
pub mod log;
pub mod show;
pub mod timer;
pub mod util;
