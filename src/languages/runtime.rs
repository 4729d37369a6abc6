//! Toolchain discovery and version checks shared by the installers

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use super::Constraint;
use crate::error::{AkamaiError, Result};
use crate::exec::{Executor, ToolCommand};
use crate::version::{self, Comparison};

/// First of `candidates` found on PATH
pub(super) fn find_binary(executor: &dyn Executor, candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().find_map(|name| {
        let found = executor.look_path(name);
        debug!(name, found = ?found, "looking up binary");
        found
    })
}

/// Locate a runtime binary or fail with `RuntimeNotFound`
pub(super) fn find_runtime(
    executor: &dyn Executor,
    runtime: &str,
    candidates: &[&str],
) -> Result<PathBuf> {
    find_binary(executor, candidates).ok_or_else(|| AkamaiError::RuntimeNotFound {
        runtime: runtime.to_string(),
    })
}

/// Locate a package manager or fail with `PackageManagerNotFound`
pub(super) fn find_package_manager(
    executor: &dyn Executor,
    manager: &str,
    candidates: &[&str],
) -> Result<PathBuf> {
    find_binary(executor, candidates).ok_or_else(|| AkamaiError::PackageManagerNotFound {
        manager: manager.to_string(),
    })
}

/// Version-probing details for one runtime
pub(super) struct VersionProbe<'a> {
    /// Human readable runtime name
    pub runtime: &'a str,
    /// Arguments printing the version
    pub args: &'a [&'a str],
    /// Pattern whose first capture group is the version
    pub pattern: &'a Regex,
}

/// Enforce `constraint` against the version reported by `binary`.
///
/// A constraint of `""` or `"*"` is not checked. A version that cannot be
/// extracted or parsed is `RuntimeNoVersionFound`; an older one is
/// `RuntimeMinimumVersionRequired`. If the constraint itself is not a
/// valid version it cannot be enforced and the install proceeds.
pub(super) fn check_version(
    executor: &dyn Executor,
    binary: &Path,
    probe: &VersionProbe<'_>,
    constraint: &Constraint,
) -> Result<()> {
    let Some(required) = constraint.minimum() else {
        return Ok(());
    };

    let output = executor.run(&ToolCommand::new(binary).args(probe.args))?;
    let combined = output.combined();

    let installed = probe
        .pattern
        .captures(&combined)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| version::compare(v, v) != Comparison::Error)
        .ok_or_else(|| AkamaiError::RuntimeNoVersionFound {
            runtime: probe.runtime.to_string(),
        })?;

    debug!(runtime = probe.runtime, installed, required, "checking runtime version");

    match version::satisfies_minimum(&installed, required) {
        Some(false) => Err(AkamaiError::RuntimeMinimumVersionRequired {
            runtime: probe.runtime.to_string(),
            required: required.to_string(),
            installed,
        }),
        Some(true) => Ok(()),
        None => {
            warn!(
                runtime = probe.runtime,
                required, "unable to interpret version requirement, skipping check"
            );
            Ok(())
        }
    }
}

/// Run a package manager step, mapping failures to `PackageManagerExec`
pub(super) fn run_package_manager(
    executor: &dyn Executor,
    manager: &str,
    command: &ToolCommand,
) -> Result<()> {
    let output = executor.run(command).map_err(|e| AkamaiError::PackageManagerExec {
        manager: manager.to_string(),
        reason: e.to_string(),
    })?;

    if output.success {
        Ok(())
    } else {
        Err(AkamaiError::PackageManagerExec {
            manager: manager.to_string(),
            reason: output.failure_reason(),
        })
    }
}
