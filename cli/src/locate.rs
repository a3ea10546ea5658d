use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformIdentifier;
use log::debug;
use std::path::{Path, PathBuf};

/// Places an already-installed binary may live, in probe order.
///
/// First the companion npm package (`node_modules/@agentmap/<key>/bin`) found
/// by walking up from the package root the way node resolves modules, then
/// the package's own `bin/`.
pub fn candidates(cfg: &LauncherConfig, platform: PlatformIdentifier) -> Vec<PathBuf> {
    let root = cfg.package_root();
    let binary = platform.binary_name(&cfg.binary);
    let package = format!("{}/{}", cfg.npm_scope.trim_end_matches('/'), platform.npm_key());

    let mut out = Vec::new();
    if let Some(pkg_dir) = find_companion_package(&root, &package) {
        out.push(pkg_dir.join("bin").join(&binary));
    }
    out.push(root.join("bin").join(&binary));
    out
}

fn find_companion_package(start: &Path, package: &str) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join("node_modules").join(package);
        if candidate.join("package.json").is_file() {
            return Some(candidate);
        }
    }
    None
}

/// First existing candidate; never touches the network.
pub fn locate_binary(cfg: &LauncherConfig, platform: PlatformIdentifier) -> Result<PathBuf> {
    let searched = candidates(cfg, platform);
    for path in &searched {
        if path.is_file() {
            debug!("found binary at {}", path.display());
            return Ok(path.clone());
        }
        debug!("no binary at {}", path.display());
    }
    Err(Error::BinaryNotFound { searched })
}
