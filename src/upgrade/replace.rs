//! Atomic replacement of the running executable
//!
//! The new binary is written next to the target, the target is renamed to
//! `<name>.old` and the new file renamed into place. If the second rename
//! fails the original is renamed back. Only when that also fails is the
//! result [`AkamaiError::RollbackFailed`], which callers must treat as fatal.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::checksum;
use crate::error::{AkamaiError, Result};

/// Path the original binary is parked at during the swap
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".old");
    target.with_file_name(name)
}

/// Replace `target` with `contents` after verifying them against `signature`.
///
/// The checksum is verified before anything on disk is touched.
pub fn replace_executable(target: &Path, contents: &[u8], signature: &str) -> Result<()> {
    replace_with(target, contents, signature, |staged, target| {
        staged.persist(target).map(drop).map_err(|e| e.error)
    })
}

/// [`replace_executable`] with the final move into place supplied by `place`
fn replace_with<F>(target: &Path, contents: &[u8], signature: &str, place: F) -> Result<()>
where
    F: FnOnce(NamedTempFile, &Path) -> std::io::Result<()>,
{
    checksum::verify(contents, signature)?;

    let failed = |reason: String| AkamaiError::UpgradeFailed { reason };
    let dir = target
        .parent()
        .ok_or_else(|| failed(format!("{} has no parent directory", target.display())))?;

    let staged = stage(dir, target, contents).map_err(|e| failed(e.to_string()))?;

    let backup = backup_path(target);
    if backup.exists() {
        fs::remove_file(&backup).map_err(|e| failed(e.to_string()))?;
    }

    fs::rename(target, &backup).map_err(|e| failed(e.to_string()))?;
    debug!(backup = %backup.display(), "original parked");

    if let Err(e) = place(staged, target) {
        warn!(error = %e, "unable to move new binary into place, rolling back");
        return match fs::rename(&backup, target) {
            Ok(()) => Err(failed(e.to_string())),
            Err(rollback) => Err(AkamaiError::RollbackFailed {
                reason: rollback.to_string(),
            }),
        };
    }

    if let Err(e) = fs::remove_file(&backup) {
        debug!(error = %e, "leaving old binary behind");
    }
    Ok(())
}

/// Write `contents` to a temp file in `dir` carrying the permissions of `target`
fn stage(dir: &Path, target: &Path, contents: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix(".akamai-upgrade-")
        .tempfile_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;

    let permissions = fs::metadata(target)?.permissions();
    fs::set_permissions(staged.path(), permissions)?;
    Ok(staged)
}
