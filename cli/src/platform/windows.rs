use crate::platform::PlatformOps;
use std::path::{Path, PathBuf};

pub static WINDOWS_PLATFORM: Windows = Windows;

pub struct Windows;

impl PlatformOps for Windows {
    fn home_dir(&self) -> Option<PathBuf> { std::env::var_os("USERPROFILE").map(PathBuf::from) }
    // .exe files are runnable as-is
    fn make_executable(&self, _path: &Path) -> std::io::Result<()> { Ok(()) }
}
