//! Prebuilt binary downloads, the fallback when dependencies cannot be installed

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AkamaiError, Result};
use crate::http::Fetcher;
use crate::manifest::{BinaryTarget, PackageManifest};

/// Whether any command of `manifest` advertises a binary for `target`
pub fn advertises_binary(manifest: &PackageManifest, target: &BinaryTarget) -> bool {
    manifest
        .commands
        .iter()
        .any(|c| matches!(c.binary_url(target), Ok(Some(_))))
}

/// Path a downloaded binary for `command` is written to
pub fn binary_path(package_dir: &Path, command: &str, target: &BinaryTarget) -> PathBuf {
    package_dir
        .join("bin")
        .join(format!("akamai-{}{}", command.to_lowercase(), target.bin_suffix))
}

/// Download every advertised binary into `<package>/bin/`
pub fn download_binaries(
    fetcher: &dyn Fetcher,
    package_dir: &Path,
    manifest: &PackageManifest,
    target: &BinaryTarget,
) -> Result<()> {
    for command in &manifest.commands {
        let failed = |reason: String| AkamaiError::BinaryDownloadFailed {
            command: command.name.clone(),
            reason,
        };

        let Some(url) = command.binary_url(target)? else {
            continue;
        };
        info!(command = %command.name, url, "downloading binary");

        let body = fetcher.get(&url).map_err(|e| failed(e.to_string()))?;
        let destination = binary_path(package_dir, &command.name, target);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }
        fs::write(&destination, body).map_err(|e| failed(e.to_string()))?;
        make_executable(&destination).map_err(|e| failed(e.to_string()))?;
    }

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o775))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
