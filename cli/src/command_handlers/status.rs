use anyhow::Result;
use launcher::config::LauncherConfig;
use launcher::ledger::{installed_digest, VersionLedger};
use launcher::platform::PlatformIdentifier;

pub fn print_status(cfg: &LauncherConfig) -> Result<()> {
    let platform = PlatformIdentifier::current()?;
    let ledger = VersionLedger::new(cfg.bin_dir(), platform.binary_name(&cfg.binary));
    let state = ledger.state();

    println!("platform  {platform}");
    println!("binary    {}", state.binary_path.display());
    match &state.recorded_version {
        Some(v) => println!("version   {v}"),
        None => println!("version   <not installed>"),
    }
    if state.binary_path.is_file() {
        println!("sha256    {}", installed_digest(&state.binary_path)?);
    } else {
        println!("sha256    <missing>");
    }
    if let Some(pinned) = &cfg.pinned_version {
        println!("pinned    {pinned}");
    }
    Ok(())
}
