//! Ordered directories searched for command executables
//!
//! The search space is an explicit value handed to the resolver. The
//! process `PATH` is read once to build it and is never modified.

use std::path::{Path, PathBuf};

use crate::host;
use crate::paths::CliPaths;

/// Directories to search, package directories first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRoots {
    /// `bin/` and root directory of every installed package
    pub packages: Vec<PathBuf>,
    /// Directories from the process `PATH`
    pub system: Vec<PathBuf>,
}

impl SearchRoots {
    /// Installed packages of `paths` followed by the process `PATH`
    pub fn discover(paths: &CliPaths) -> Self {
        let system = std::env::var_os("PATH")
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default();
        Self {
            packages: package_roots(&paths.package_dirs()),
            system,
        }
    }

    /// Only the given package directory
    pub fn package(package_dir: &Path) -> Self {
        Self {
            packages: package_roots(&[package_dir.to_path_buf()]),
            system: Vec::new(),
        }
    }

    /// Find the first executable named like one of `names`.
    ///
    /// Package roots are exhausted before the system `PATH`; within a scope
    /// each name is tried in every directory before the next name. The flag
    /// is `true` when the match came from a package root.
    pub fn find(&self, names: &[String]) -> Option<(PathBuf, bool)> {
        find_in(&self.packages, names)
            .map(|p| (p, true))
            .or_else(|| find_in(&self.system, names).map(|p| (p, false)))
    }
}

fn package_roots(package_dirs: &[PathBuf]) -> Vec<PathBuf> {
    package_dirs
        .iter()
        .flat_map(|dir| [dir.join("bin"), dir.clone()])
        .collect()
}

fn find_in(dirs: &[PathBuf], names: &[String]) -> Option<PathBuf> {
    names.iter().find_map(|name| {
        dirs.iter().find_map(|dir| {
            host::executable_suffixes()
                .iter()
                .map(|suffix| dir.join(format!("{name}{suffix}")))
                .find(|candidate| is_executable(candidate))
        })
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
