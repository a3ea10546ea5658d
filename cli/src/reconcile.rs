use crate::archive;
use crate::config::LauncherConfig;
use crate::error::{Error, Phase, ReconcileError};
use crate::fetch::{ArtifactFetcher, DownloadTarget};
use crate::http::build_client;
use crate::ledger::VersionLedger;
use crate::platform::PlatformIdentifier;
use crate::release::{PinnedVersion, ReleaseIndex, ReleaseVersion, VersionSource};
use log::info;
use reqwest::blocking::Client;
use std::path::PathBuf;

/// What a reconcile cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub binary_path: PathBuf,
    pub version: ReleaseVersion,
    pub downloaded: bool,
}

/// Converges `bin/` onto the wanted release.
pub struct Reconciler {
    cfg: LauncherConfig,
    platform: PlatformIdentifier,
    client: Client,
    ledger: VersionLedger,
}

impl Reconciler {
    pub fn new(cfg: LauncherConfig, platform: PlatformIdentifier) -> crate::error::Result<Self> {
        let client = build_client(&cfg)?;
        let ledger = VersionLedger::new(cfg.bin_dir(), platform.binary_name(&cfg.binary));
        Ok(Self {
            cfg,
            platform,
            client,
            ledger,
        })
    }

    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    pub fn ensure_binary(&self) -> Result<PathBuf, ReconcileError> {
        self.reconcile().map(|o| o.binary_path)
    }

    /// Lock, pick a version, download only if the ledger disagrees, record.
    pub fn reconcile(&self) -> Result<Outcome, ReconcileError> {
        let _lock = self
            .ledger
            .lock()
            .map_err(|e| ReconcileError::new(Phase::Lock, e))?;

        let version = self
            .version_source()
            .latest_version()
            .map_err(|e| ReconcileError::new(Phase::VersionDiscovery, e))?;

        if !self.ledger.needs_update(&version) {
            info!("{} {version} already installed", self.cfg.binary);
            return Ok(Outcome {
                binary_path: self.ledger.binary_path(),
                version,
                downloaded: false,
            });
        }

        let target = DownloadTarget::new(&self.cfg, &version, self.platform);
        info!("installing {} {version} for {}", self.cfg.binary, self.platform);
        let download = ArtifactFetcher::new(&self.client)
            .fetch(&target)
            .map_err(|e| ReconcileError::new(Phase::Download, e))?;

        let binary_path = archive::install(download, self.ledger.bin_dir(), &target.expected_entry_name)
            .map_err(|e| {
                let phase = match e {
                    Error::Permissions { .. } => Phase::Permissions,
                    _ => Phase::Extraction,
                };
                ReconcileError::new(phase, e)
            })?;

        // binary is in place; only now may the marker claim it
        self.ledger
            .record(&version)
            .map_err(|e| ReconcileError::new(Phase::Ledger, e))?;

        Ok(Outcome {
            binary_path,
            version,
            downloaded: true,
        })
    }

    fn version_source(&self) -> Box<dyn VersionSource + '_> {
        match &self.cfg.pinned_version {
            Some(tag) => Box::new(PinnedVersion(ReleaseVersion::new(tag.trim()))),
            None => Box::new(ReleaseIndex::new(&self.client, &self.cfg)),
        }
    }
}
