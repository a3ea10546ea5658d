use crate::cli::Commands;
use crate::command_handlers::{install, locate, run, status};
use anyhow::Result;
use launcher::config::LauncherConfig;

/// Returns the process exit code.
pub fn dispatch(cmd: Commands, cfg: &LauncherConfig) -> Result<i32> {
    match cmd {
        Commands::Install => install::run_install(cfg).map(|()| 0),
        Commands::Run { args } => run::run(cfg, &args),
        Commands::Locate => locate::print_location(cfg).map(|()| 0),
        Commands::Status => status::print_status(cfg).map(|()| 0),
    }
}
