use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use launcher::config::LauncherConfig;
use launcher::platform::PlatformIdentifier;
use launcher::reconcile::{Outcome, Reconciler};
use std::time::Duration;

pub fn run_install(cfg: &LauncherConfig) -> Result<()> {
    let outcome = reconcile_with_spinner(cfg)?;
    if outcome.downloaded {
        println!("Installed {} {}", cfg.binary, outcome.version);
    }
    println!("{} is ready to use!", cfg.binary);
    Ok(())
}

/// Reconcile while showing a spinner; the spinner is cleared either way.
pub fn reconcile_with_spinner(cfg: &LauncherConfig) -> Result<Outcome> {
    let platform = PlatformIdentifier::current()?;
    let reconciler = Reconciler::new(cfg.clone(), platform)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").context("spinner template")?);
    pb.set_message(format!("Checking for the latest {} release", cfg.binary));
    pb.enable_steady_tick(Duration::from_millis(120));
    let res = reconciler.reconcile();
    pb.finish_and_clear();

    res.with_context(|| format!("Failed to install {} binary", cfg.binary))
}
