use anyhow::Result;
use launcher::config::LauncherConfig;
use launcher::locate::locate_binary;
use launcher::platform::PlatformIdentifier;

pub fn print_location(cfg: &LauncherConfig) -> Result<()> {
    let platform = PlatformIdentifier::current()?;
    let path = locate_binary(cfg, platform)?;
    println!("{}", path.display());
    Ok(())
}
