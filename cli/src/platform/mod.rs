//! Platform detection and host-specific file handling.
//!
//! [`PlatformIdentifier`] names the *target* artifact (it shows up in download
//! URLs and npm package names) while [`PlatformOps`] covers what the *host*
//! filesystem needs, such as marking a file executable.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

pub fn platform() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

pub trait PlatformOps: Sync + Send {
    fn home_dir(&self) -> Option<PathBuf>;
    fn make_executable(&self, path: &Path) -> std::io::Result<()>;
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Os {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "macos" | "darwin" => Ok(Os::Darwin),
            "linux" => Ok(Os::Linux),
            "windows" | "win32" => Ok(Os::Windows),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }

    pub fn executable_suffix(self) -> &'static str {
        match self {
            Os::Windows => ".exe",
            Os::Darwin | Os::Linux => "",
        }
    }

    fn npm_platform(self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "win32",
        }
    }
}

impl Arch {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "x86_64" | "x64" | "amd64" => Ok(Arch::X86_64),
            "aarch64" | "arm64" => Ok(Arch::Aarch64),
            other => Err(Error::UnsupportedArchitecture(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        }
    }

    fn npm_arch(self) -> &'static str {
        match self {
            Arch::X86_64 => "x64",
            Arch::Aarch64 => "arm64",
        }
    }
}

/// Canonical (os, arch) pair used to pick the release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformIdentifier {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformIdentifier {
    /// Platform of the running process.
    pub fn current() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let os = Os::parse(os)?;
        let arch = Arch::parse(arch)?;
        Ok(Self { os, arch })
    }

    pub fn binary_name(&self, base: &str) -> String {
        format!("{base}{}", self.os.executable_suffix())
    }

    /// Release asset name, e.g. `agentmap-linux-x86_64.tar.gz`.
    pub fn archive_name(&self, base: &str) -> String {
        format!("{base}-{}-{}.tar.gz", self.os.as_str(), self.arch.as_str())
    }

    /// Suffix of the companion npm package, e.g. `darwin-arm64` or `win32-x64`.
    pub fn npm_key(&self) -> String {
        format!("{}-{}", self.os.npm_platform(), self.arch.npm_arch())
    }
}

impl fmt::Display for PlatformIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}
