mod cli;
mod command_handlers;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use launcher::config::LauncherConfig;

const LOG_ENV: &str = "AGENTMAP_LAUNCHER_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match try_main(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            // BinaryNotFound already carries the remediation text
            let has_remedy = e.chain().any(|c| {
                matches!(c.downcast_ref::<launcher::Error>(), Some(launcher::Error::BinaryNotFound { .. }))
            });
            if !has_remedy {
                eprintln!();
                eprintln!("{}", launcher::REMEDIATION);
            }
            std::process::exit(1);
        }
    }
}

fn try_main(cli: Cli) -> Result<i32> {
    let cfg = LauncherConfig::load(cli.config.as_deref())?;
    command_handlers::dispatch::dispatch(cli.command, &cfg)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default.to_string());
    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp(None)
        .init();
}
