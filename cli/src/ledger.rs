use crate::error::{Error, Result};
use crate::release::ReleaseVersion;
use fs4::fs_std::FileExt;
use fs_err as fs;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const MARKER_FILE: &str = ".version";
const LOCK_FILE: &str = ".lock";

/// What is on disk right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledState {
    pub binary_path: PathBuf,
    pub recorded_version: Option<ReleaseVersion>,
}

/// The `bin/` directory: one binary plus the marker naming its version.
///
/// The binary is always replaced before the marker, so a marker naming V
/// implies the binary for V finished writing.
#[derive(Debug, Clone)]
pub struct VersionLedger {
    bin_dir: PathBuf,
    binary_name: String,
}

/// Exclusive hold on the bin directory; released on drop.
#[derive(Debug)]
pub struct LedgerLock {
    _file: File,
}

impl VersionLedger {
    pub fn new(bin_dir: impl Into<PathBuf>, binary_name: impl Into<String>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            binary_name: binary_name.into(),
        }
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    pub fn binary_path(&self) -> PathBuf {
        self.bin_dir.join(&self.binary_name)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.bin_dir.join(MARKER_FILE)
    }

    pub fn current_version(&self) -> Option<ReleaseVersion> {
        let raw = match fs::read_to_string(self.marker_path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("ignoring unreadable version marker: {e}");
                return None;
            }
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| ReleaseVersion::new(trimmed))
    }

    /// True unless both files exist and the marker names `candidate`.
    pub fn needs_update(&self, candidate: &ReleaseVersion) -> bool {
        if !self.binary_path().is_file() {
            debug!("{} missing", self.binary_path().display());
            return true;
        }
        match self.current_version() {
            Some(installed) if installed == *candidate => false,
            Some(installed) => {
                debug!("installed {installed}, wanted {candidate}");
                true
            }
            None => true,
        }
    }

    /// Atomically replace the marker with `version`.
    pub fn record(&self, version: &ReleaseVersion) -> Result<()> {
        fs::create_dir_all(&self.bin_dir)
            .map_err(|e| Error::io(format!("creating {}", self.bin_dir.display()), e))?;
        let marker = self.marker_path();
        let mut tmp = NamedTempFile::new_in(&self.bin_dir)
            .map_err(|e| Error::io(format!("creating temp file in {}", self.bin_dir.display()), e))?;
        tmp.write_all(version.as_str().as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::io(format!("writing {}", tmp.path().display()), e))?;
        tmp.persist(&marker)
            .map_err(|e| Error::io(format!("replacing {}", marker.display()), e.error))?;
        debug!("recorded {version} in {}", marker.display());
        Ok(())
    }

    pub fn state(&self) -> InstalledState {
        InstalledState {
            binary_path: self.binary_path(),
            recorded_version: self.current_version(),
        }
    }

    /// Block until no other process is reconciling this directory.
    pub fn lock(&self) -> Result<LedgerLock> {
        fs::create_dir_all(&self.bin_dir)
            .map_err(|e| Error::io(format!("creating {}", self.bin_dir.display()), e))?;
        let path = self.bin_dir.join(LOCK_FILE);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| Error::io(format!("opening {}", path.display()), e))?
            .into_parts()
            .0;
        FileExt::lock_exclusive(&file).map_err(|e| Error::io(format!("locking {}", path.display()), e))?;
        debug!("locked {}", path.display());
        Ok(LedgerLock { _file: file })
    }
}

/// Hex SHA-256 of the file at `path`.
pub fn installed_digest(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).map_err(|e| Error::io(format!("opening {}", path.display()), e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
    Ok(hex::encode(hasher.finalize()))
}
