//! Install operation
//!
//! Installing a package is:
//! 1. normalize the repository reference to a clone URL
//! 2. refuse when the package directory already exists
//! 3. shallow clone into the packages root
//! 4. read the manifest and install dependencies (or a prebuilt binary)
//!
//! Any failure after the directory is created removes it again, so a
//! failed install never leaves a half-installed package behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::repository::{githubize, is_official, repository_dir_name};
use super::{OperationContext, install_dependencies};
use crate::cli::InstallArgs;
use crate::error::{AkamaiError, Result};
use crate::git;
use crate::manifest::{self, PackageManifest};

/// Printed before installing a package that is not an official `akamai/cli-*` repository
pub const THIRD_PARTY_DISCLAIMER: &str = "Disclaimer: You are installing a third-party package, \
     subject to its own license terms. Akamai makes no representations about it.";

/// Configuration options for install
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Skip dependency installation and download the advertised binary
    pub force: bool,
}

impl From<&InstallArgs> for InstallOptions {
    fn from(args: &InstallArgs) -> Self {
        Self { force: args.force }
    }
}

/// A package that was installed
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub dir: PathBuf,
    pub manifest: PackageManifest,
}

pub struct InstallOperation<'a> {
    ctx: &'a OperationContext<'a>,
    options: InstallOptions,
}

impl<'a> InstallOperation<'a> {
    pub fn new(ctx: &'a OperationContext<'a>, options: InstallOptions) -> Self {
        Self { ctx, options }
    }

    /// Install the package referenced by `reference`
    pub fn execute(&self, reference: &str) -> Result<InstalledPackage> {
        let url = githubize(reference)?;
        let dir = self
            .ctx
            .paths
            .packages_dir
            .join(repository_dir_name(&url)?);
        debug!(reference, url, dir = %dir.display(), "installing package");

        if dir.exists() {
            return Err(AkamaiError::PackageAlreadyExists {
                path: dir.display().to_string(),
            });
        }
        self.ctx.paths.ensure_packages_dir()?;

        let terminal = self.ctx.terminal;
        terminal.spinner_start(&format!("Attempting to fetch package configuration from {url}"));

        match self.install_into(&url, &dir) {
            Ok(manifest) => {
                terminal.spinner_ok();
                info!(package = %dir.display(), "installed");
                Ok(InstalledPackage { dir, manifest })
            }
            Err(e) => {
                terminal.spinner_fail();
                remove_partial(&dir);
                Err(e)
            }
        }
    }

    fn install_into(&self, url: &str, dir: &Path) -> Result<PackageManifest> {
        git::clone(url, dir, git::CLONE_DEPTH)?;

        if !is_official(url) {
            self.ctx.terminal.warn(THIRD_PARTY_DISCLAIMER);
        }

        let manifest = manifest::read_manifest(dir)?;
        install_dependencies(self.ctx, dir, &manifest, self.options.force)?;
        Ok(manifest)
    }
}

fn remove_partial(dir: &Path) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = fs::remove_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "unable to remove partially installed package");
    }
}
