//! Update operation
//!
//! Pulls a package and reinstalls its dependencies only when the pull moved
//! `HEAD`, so updating twice in a row does the expensive work at most once.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{OperationContext, install_dependencies};
use crate::cli::UpdateArgs;
use crate::error::{AkamaiError, Result};
use crate::git;
use crate::manifest;
use crate::paths::package_name;

/// Configuration options for update
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Reinstall dependencies even when nothing changed upstream
    pub force: bool,
}

impl From<&UpdateArgs> for UpdateOptions {
    fn from(args: &UpdateArgs) -> Self {
        Self { force: args.force }
    }
}

/// What happened to one package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// New commits were pulled and dependencies reinstalled
    Updated,
    /// Nothing changed upstream
    UpToDate,
}

pub struct UpdateOperation<'a> {
    ctx: &'a OperationContext<'a>,
    options: UpdateOptions,
}

impl<'a> UpdateOperation<'a> {
    pub fn new(ctx: &'a OperationContext<'a>, options: UpdateOptions) -> Self {
        Self { ctx, options }
    }

    /// Update the packages owning `commands`, or every package when empty
    pub fn execute(&self, commands: &[String]) -> Result<Vec<(PathBuf, UpdateOutcome)>> {
        let package_dirs = if commands.is_empty() {
            self.ctx.paths.package_dirs()
        } else {
            self.owning_packages(commands)?
        };

        let total = package_dirs.len();
        let mut outcomes = Vec::new();
        let mut failures: Vec<(String, AkamaiError)> = Vec::new();

        for dir in package_dirs {
            match self.update_package(&dir) {
                Ok(outcome) => outcomes.push((dir, outcome)),
                Err(e) => {
                    let name = package_name(&dir);
                    warn!(package = %dir.display(), error = %e, "update failed");
                    self.ctx
                        .terminal
                        .warn(&format!("Unable to update \"{name}\": {e}"));
                    failures.push((name, e));
                }
            }
        }

        if total == 1 {
            if let Some((_, e)) = failures.pop() {
                return Err(e);
            }
        }
        if !failures.is_empty() {
            let packages: Vec<String> = failures.into_iter().map(|(name, _)| name).collect();
            return Err(AkamaiError::UpdateFailed {
                packages: packages.join(", "),
            });
        }

        Ok(outcomes)
    }

    fn owning_packages(&self, commands: &[String]) -> Result<Vec<PathBuf>> {
        let registry = self.ctx.installed_registry();
        let mut dirs: Vec<PathBuf> = Vec::new();

        for command in commands {
            let dir = registry
                .lookup(command)?
                .and_then(|c| c.package_dir.clone())
                .ok_or_else(|| AkamaiError::NotInstalled {
                    command: command.clone(),
                })?;
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }

        Ok(dirs)
    }

    /// Pull one package and reinstall its dependencies if `HEAD` moved
    pub fn update_package(&self, dir: &Path) -> Result<UpdateOutcome> {
        let terminal = self.ctx.terminal;
        let name = package_name(dir);
        terminal.spinner_start(&format!("Attempting to update \"{name}\""));

        match self.pull_and_install(dir) {
            Ok(outcome) => {
                terminal.spinner_ok();
                if outcome == UpdateOutcome::UpToDate {
                    terminal.writeln(&format!("Package \"{name}\" is already up-to-date"));
                }
                Ok(outcome)
            }
            Err(e) => {
                terminal.spinner_fail();
                Err(e)
            }
        }
    }

    fn pull_and_install(&self, dir: &Path) -> Result<UpdateOutcome> {
        let repo = git::open(dir)?;
        let before = git::head(&repo)?;
        git::pull(&repo)?;
        let after = git::head(&repo)?;
        debug!(package = %dir.display(), before, after, "pulled");

        if before == after && !self.options.force {
            return Ok(UpdateOutcome::UpToDate);
        }

        let manifest = manifest::read_manifest(dir)?;
        install_dependencies(self.ctx, dir, &manifest, false)?;
        info!(package = %dir.display(), "dependencies reinstalled");

        Ok(if before == after {
            UpdateOutcome::UpToDate
        } else {
            UpdateOutcome::Updated
        })
    }
}
