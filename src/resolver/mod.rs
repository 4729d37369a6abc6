//! Command resolution
//!
//! Turns a command name into the argument vector that runs it:
//!
//! 1. derive the executable names (`akamai-foo-bar`, `akamaiFooBar`)
//! 2. search installed package `bin/` and root directories, then the system `PATH`
//! 3. walk up from the match to the owning package and read its manifest
//! 4. let the package language build the invocation (interpreter prefix, env)
//!
//! [`Registry`] answers the earlier question of which installed command a
//! name or alias refers to, rejecting ambiguous names.

mod naming;
mod registry;
mod search;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AkamaiError, Result};
use crate::exec::Executor;
use crate::languages::{Invocation, Language};
use crate::manifest::{self, PackageManifest};
use crate::paths::CliPaths;

use naming::candidate_names;
pub use registry::{RegisteredCommand, Registry};
pub use search::SearchRoots;

/// A command ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Executable that matched
    pub executable: PathBuf,

    /// Owning package, when the executable belongs to one
    pub package_dir: Option<PathBuf>,

    /// Manifest of the owning package
    pub manifest: Option<PackageManifest>,

    /// Runtime of the owning package
    pub language: Language,

    /// Program and leading arguments to run
    pub invocation: Invocation,
}

impl Resolution {
    /// Version the owning package declares for `command`
    pub fn command_version(&self, command: &str) -> Option<&str> {
        self.manifest
            .as_ref()?
            .command(command)
            .map(|c| c.version.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Resolves command names against an explicit search space
pub struct Resolver<'a> {
    executor: &'a dyn Executor,
    packages_dir: PathBuf,
    roots: SearchRoots,
}

impl<'a> Resolver<'a> {
    pub fn new(executor: &'a dyn Executor, paths: &CliPaths, roots: SearchRoots) -> Self {
        Self {
            executor,
            packages_dir: paths.packages_dir.clone(),
            roots,
        }
    }

    /// Resolve `command` across installed packages and the system `PATH`
    pub fn resolve(&self, command: &str) -> Result<Resolution> {
        self.resolve_with(&self.roots, command)
    }

    /// Resolve `command` inside a single installed package
    pub fn resolve_in(&self, package_dir: &Path, command: &str) -> Result<Resolution> {
        self.resolve_with(&SearchRoots::package(package_dir), command)
    }

    fn resolve_with(&self, roots: &SearchRoots, command: &str) -> Result<Resolution> {
        let names = candidate_names(command);
        debug!(command, candidates = ?names, "resolving executable");

        let (executable, from_package) =
            roots
                .find(&names)
                .ok_or_else(|| AkamaiError::ExecutableNotFound {
                    command: command.to_string(),
                })?;
        debug!(executable = %executable.display(), from_package, "found executable");

        let boundary = from_package.then_some(self.packages_dir.as_path());
        let Some(package_dir) = manifest::find_package_dir(&executable, boundary) else {
            if from_package {
                warn!(executable = %executable.display(), "package has no manifest");
            }
            let mut invocation = Invocation::direct(&executable);
            if from_package {
                invocation.warning = Some(crate::languages::UNDEFINED_LANGUAGE_WARNING.to_string());
            }
            return Ok(Resolution {
                executable,
                package_dir: None,
                manifest: None,
                language: Language::Undefined,
                invocation,
            });
        };

        let manifest = manifest::read_manifest(&package_dir)?;
        let language = Language::from_requirements(&manifest.requirements);
        debug!(package = %package_dir.display(), %language, "package language");

        let invocation = language.installer().resolve_invocation(
            self.executor,
            &package_dir,
            &executable,
        )?;

        Ok(Resolution {
            executable,
            package_dir: Some(package_dir),
            manifest: Some(manifest),
            language,
            invocation,
        })
    }
}
