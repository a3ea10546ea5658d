//! Extract the one executable we want out of a `.tar.gz` stream.
//!
//! Entries are matched by their exact raw path. Anything else in the archive,
//! including look-alikes such as `bin/agentmap` or `../agentmap`, is skipped
//! without touching disk, so a hostile archive can only ever produce the
//! single expected file inside `target_dir`.

use crate::error::{Error, Result};
use crate::platform::platform;
use flate2::read::GzDecoder;
use fs_err as fs;
use log::debug;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use tempfile::NamedTempFile;

pub fn install(reader: impl Read, target_dir: &Path, expected_entry_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(target_dir)
        .map_err(|e| Error::io(format!("creating {}", target_dir.display()), e))?;

    let mut archive = Archive::new(GzDecoder::new(reader));
    let entries = archive.entries().map_err(Error::ExtractionFailed)?;
    for entry in entries {
        let mut entry = entry.map_err(Error::ExtractionFailed)?;
        let matches = entry.header().entry_type().is_file()
            && *entry.path_bytes() == *expected_entry_name.as_bytes();
        if !matches {
            debug!("skipping archive entry {}", String::from_utf8_lossy(&entry.path_bytes()));
            continue;
        }
        let size = entry.header().size().map_err(Error::ExtractionFailed)?;
        return write_entry(&mut entry, size, target_dir, expected_entry_name);
    }
    Err(Error::EntryNotFound(expected_entry_name.to_string()))
}

/// Stage next to the destination so the final rename stays on one filesystem.
fn write_entry(entry: &mut impl Read, size: u64, target_dir: &Path, name: &str) -> Result<PathBuf> {
    let dest = target_dir.join(name);
    let mut staged = NamedTempFile::new_in(target_dir)
        .map_err(|e| Error::io(format!("creating temp file in {}", target_dir.display()), e))?;
    let copied = std::io::copy(entry, staged.as_file_mut()).map_err(Error::ExtractionFailed)?;
    if copied != size {
        return Err(Error::ExtractionFailed(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("entry '{name}' truncated: {copied} of {size} bytes"),
        )));
    }
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(format!("flushing {}", staged.path().display()), e))?;
    platform()
        .make_executable(staged.path())
        .map_err(|source| Error::Permissions {
            path: dest.clone(),
            source,
        })?;
    staged
        .persist(&dest)
        .map_err(|e| Error::io(format!("moving binary into {}", dest.display()), e.error))?;
    debug!("installed {}", dest.display());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, EntryType, Header};

    /// Build a `.tar.gz` in memory. Names go straight into the header bytes so
    /// fixtures can carry paths `tar::Builder` would refuse (`..` segments).
    fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (name, data) in entries {
            let mut header = Header::new_old();
            let raw = &mut header.as_old_mut().name;
            raw[..name.len()].copy_from_slice(name.as_bytes());
            header.set_entry_type(EntryType::Regular);
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn files_under(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn installs_only_the_expected_entry() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("pkg").join("bin");
        let archive = tar_gz(&[
            ("foo", &b"foo"[..]),
            ("agentmap", &b"the real binary"[..]),
            ("evil/../../etc/passwd", &b"root::0:0"[..]),
        ]);

        let path = install(&archive[..], &target, "agentmap").unwrap();

        assert_eq!(path, target.join("agentmap"));
        assert_eq!(std::fs::read(&path).unwrap(), b"the real binary");
        assert_eq!(files_under(&target), vec!["agentmap".to_string()]);
        assert_eq!(files_under(&root.path().join("pkg")), vec!["bin".to_string()]);
        assert!(!root.path().join("etc").exists());
    }

    #[test]
    fn lookalike_paths_do_not_match() {
        let target = tempfile::tempdir().unwrap();
        let archive = tar_gz(&[
            ("bin/agentmap", &b"nested"[..]),
            ("./agentmap", &b"dotted"[..]),
            ("agentmap.sig", &b"sig"[..]),
            ("../agentmap", &b"escape"[..]),
        ]);
        let err = install(&archive[..], target.path(), "agentmap").unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(ref n) if n == "agentmap"), "{err:?}");
        assert!(files_under(target.path()).is_empty());
    }

    #[test]
    fn replaces_an_existing_binary() {
        let target = tempfile::tempdir().unwrap();
        std::fs::write(target.path().join("agentmap"), b"old").unwrap();
        let archive = tar_gz(&[("agentmap", &b"new"[..])]);
        install(&archive[..], target.path(), "agentmap").unwrap();
        assert_eq!(std::fs::read(target.path().join("agentmap")).unwrap(), b"new");
    }

    #[test]
    fn garbage_is_extraction_failure() {
        let target = tempfile::tempdir().unwrap();
        let err = install(&b"definitely not gzip"[..], target.path(), "agentmap").unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed(_)), "{err:?}");
    }

    #[test]
    fn truncated_archive_is_extraction_failure() {
        let target = tempfile::tempdir().unwrap();
        // incompressible, so half the gzip stream still holds the tar header
        let mut seed = 0x2545_f491_u32;
        let noise: Vec<u8> = (0..64 * 1024)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (seed >> 16) as u8
            })
            .collect();
        let archive = tar_gz(&[("agentmap", noise.as_slice())]);
        let cut = &archive[..archive.len() / 2];
        let err = install(cut, target.path(), "agentmap").unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed(_)), "{err:?}");
        assert!(!target.path().join("agentmap").exists());
    }

    #[cfg(unix)]
    #[test]
    fn installed_binary_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let target = tempfile::tempdir().unwrap();
        let archive = tar_gz(&[("agentmap", &b"#!/bin/sh\n"[..])]);
        let path = install(&archive[..], target.path(), "agentmap").unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
