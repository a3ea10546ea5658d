use crate::command_handlers::install::reconcile_with_spinner;
use anyhow::Result;
use launcher::config::LauncherConfig;
use launcher::locate::locate_binary;
use launcher::platform::PlatformIdentifier;
use launcher::runner::run_binary;
use launcher::Error;
use log::info;
use std::ffi::OsString;

/// Exec agentmap, installing it first only when no copy can be found.
pub fn run(cfg: &LauncherConfig, args: &[OsString]) -> Result<i32> {
    let platform = PlatformIdentifier::current()?;
    let binary = match locate_binary(cfg, platform) {
        Ok(path) => path,
        Err(Error::BinaryNotFound { .. }) => {
            info!("no installed binary, fetching one");
            reconcile_with_spinner(cfg)?.binary_path
        }
        Err(e) => return Err(e.into()),
    };
    Ok(run_binary(&binary, args))
}
