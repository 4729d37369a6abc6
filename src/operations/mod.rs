//! Package lifecycle operations
//!
//! Each operation coordinates the git client, the manifest reader and the
//! language installers for one user-facing action:
//!
//! - [`InstallOperation`]: clone, install dependencies, fail closed
//! - [`UpdateOperation`]: pull, reinstall dependencies when `HEAD` moved
//! - [`UninstallOperation`]: remove a package directory
//! - [`ListOperation`] / [`SearchOperation`]: report installed and available packages
//!
//! Collaborators are passed in through [`OperationContext`] so every flow
//! runs against scripted doubles in tests.

pub mod binary;
pub mod install;
pub mod list;
pub mod repository;
pub mod search;
pub mod uninstall;
pub mod update;

use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::exec::Executor;
use crate::http::Fetcher;
use crate::languages::Language;
use crate::manifest::{BinaryTarget, PackageManifest};
use crate::paths::CliPaths;
use crate::resolver::Registry;
use crate::terminal::Terminal;

pub use install::{InstallOperation, InstallOptions};
pub use list::ListOperation;
pub use search::SearchOperation;
pub use uninstall::UninstallOperation;
pub use update::{UpdateOperation, UpdateOptions};

/// External collaborators shared by all operations
pub struct OperationContext<'a> {
    pub paths: &'a CliPaths,
    pub executor: &'a dyn Executor,
    pub terminal: &'a dyn Terminal,
    pub fetcher: &'a dyn Fetcher,
    pub target: BinaryTarget,
}

impl OperationContext<'_> {
    /// Registry of installed commands (no built-ins)
    pub fn installed_registry(&self) -> Registry {
        Registry::load(self.paths, Vec::new())
    }
}

/// Install a package's dependencies, falling back to prebuilt binaries.
///
/// With `force` and an advertised binary, dependency installation is
/// skipped and the binary downloaded directly. Otherwise a failed
/// dependency install offers the binary when one is advertised.
pub fn install_dependencies(
    ctx: &OperationContext<'_>,
    package_dir: &Path,
    manifest: &PackageManifest,
    force: bool,
) -> Result<()> {
    let language = Language::from_requirements(&manifest.requirements);
    let has_binary = binary::advertises_binary(manifest, &ctx.target);
    info!(package = %package_dir.display(), %language, has_binary, "installing dependencies");

    if force && has_binary {
        return binary::download_binaries(ctx.fetcher, package_dir, manifest, &ctx.target);
    }

    let installer = language.installer();
    match installer.install_dependencies(ctx.executor, package_dir, &manifest.commands) {
        Ok(()) => Ok(()),
        Err(e) if has_binary => {
            warn!(error = %e, "dependency installation failed, binary available");
            ctx.terminal.warn(&e.to_string());
            if ctx
                .terminal
                .confirm("Would you like to download a pre-built binary instead?", true)?
            {
                binary::download_binaries(ctx.fetcher, package_dir, manifest, &ctx.target)
            } else {
                Err(e)
            }
        }
        Err(e) => Err(e),
    }
}
