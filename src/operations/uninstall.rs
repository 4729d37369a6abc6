//! Uninstall operation

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::OperationContext;
use crate::error::{AkamaiError, Result};
use crate::paths::package_name;

pub struct UninstallOperation<'a> {
    ctx: &'a OperationContext<'a>,
}

impl<'a> UninstallOperation<'a> {
    pub fn new(ctx: &'a OperationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Remove the package providing `command`
    pub fn execute(&self, command: &str) -> Result<PathBuf> {
        let not_installed = || AkamaiError::NotInstalled {
            command: command.to_string(),
        };

        let dir = self
            .ctx
            .installed_registry()
            .lookup(command)?
            .and_then(|c| c.package_dir.clone())
            .ok_or_else(not_installed)?;

        if !self.is_managed(&dir) {
            return Err(not_installed());
        }

        let terminal = self.ctx.terminal;
        terminal.spinner_start(&format!("Attempting to uninstall \"{}\"", package_name(&dir)));
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                terminal.spinner_ok();
                info!(package = %dir.display(), "uninstalled");
                Ok(dir)
            }
            Err(e) => {
                terminal.spinner_fail();
                Err(AkamaiError::io(
                    format!("Unable to remove directory {}", dir.display()),
                    e,
                ))
            }
        }
    }

    /// Whether `dir` is a package directory directly under the packages root
    fn is_managed(&self, dir: &Path) -> bool {
        let (Ok(dir), Ok(root)) = (
            dunce::canonicalize(dir),
            dunce::canonicalize(&self.ctx.paths.packages_dir),
        ) else {
            return false;
        };
        dir.parent() == Some(root.as_path())
    }
}
