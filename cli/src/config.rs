use crate::error::{Error, Result};
use crate::platform::platform;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com";

/// Where releases live and where the binary is cached.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    pub owner: String,
    pub repo: String,
    /// Executable name without platform suffix
    pub binary: String,
    pub api_base: String,
    pub download_base: String,
    /// Directory holding `bin/`; see [`LauncherConfig::package_root`]
    pub package_root: Option<PathBuf>,
    pub npm_scope: String,
    /// Skip the release index and install exactly this tag
    pub pinned_version: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            owner: "nguyenphutrong".to_string(),
            repo: "agentmap".to_string(),
            binary: "agentmap".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            package_root: None,
            npm_scope: "@agentmap".to_string(),
            pinned_version: None,
            timeout_secs: 300,
        }
    }
}

impl LauncherConfig {
    /// Defaults, then the TOML file, then `AGENTMAP_*` environment overrides.
    ///
    /// An explicit `path` must exist; the per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.is_file()),
        };
        let mut cfg = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs_err::read_to_string(path)
            .map_err(|e| Error::io(format!("reading config {}", path.display()), e))?;
        toml::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("AGENTMAP_PACKAGE_ROOT") {
            self.package_root = Some(PathBuf::from(v));
        }
        if let Some(v) = var("AGENTMAP_VERSION") {
            self.pinned_version = Some(v);
        }
        if let Some(v) = var("AGENTMAP_RELEASES_API") {
            self.api_base = v;
        }
        if let Some(v) = var("AGENTMAP_DOWNLOAD_BASE") {
            self.download_base = v;
        }
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [("owner", &self.owner), ("repo", &self.repo), ("binary", &self.binary)] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("'{field}' must not be empty")));
            }
        }
        // the binary name doubles as the archive entry name
        if self.binary.contains(['/', '\\']) || self.binary == ".." {
            return Err(Error::Config(format!("'binary' must be a bare file name, got '{}'", self.binary)));
        }
        if self.pinned_version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(Error::Config("'pinned_version' must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured root, else `<data_local_dir>/agentmap`, else the current directory.
    pub fn package_root(&self) -> PathBuf {
        if let Some(root) = &self.package_root {
            return root.clone();
        }
        dirs::data_local_dir()
            .or_else(|| platform().home_dir().map(|h| h.join(".local").join("share")))
            .map(|d| d.join(&self.binary))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.package_root().join("bin")
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("agentmap").join("launcher.toml"))
}
