//! Python packages; dependencies installed with pip into the package directory

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::runtime::{
    VersionProbe, check_version, find_package_manager, find_runtime, run_package_manager,
};
use super::{Constraint, Invocation, LanguageInstaller};
use crate::error::Result;
use crate::exec::{Executor, ToolCommand};
use crate::manifest::Command;
use crate::version::{self, Comparison};

/// Environment variable pointing pip and the interpreter at per-package site-packages
pub const USER_BASE_ENV: &str = "PYTHONUSERBASE";

static PYTHON_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"Python (\d+\.\d+\.\d+)").unwrap()
});

/// Major line a constraint pins the interpreter to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Series {
    Any,
    Python3,
    Python2,
}

pub struct PythonInstaller {
    constraint: Constraint,
}

impl PythonInstaller {
    pub fn new(constraint: Constraint) -> Self {
        Self { constraint }
    }

    fn series(&self) -> Series {
        match self.constraint.minimum() {
            None => Series::Any,
            Some(required) => match version::compare(required, "3.0.0") {
                Comparison::Equal | Comparison::Greater => Series::Python3,
                Comparison::Smaller => Series::Python2,
                Comparison::Error => Series::Any,
            },
        }
    }

    fn interpreter_candidates(&self) -> &'static [&'static str] {
        match self.series() {
            Series::Any => &["python3", "python2", "python"],
            Series::Python3 => &["python3", "python"],
            Series::Python2 => &["python2", "python"],
        }
    }

    fn pip_candidates(&self) -> &'static [&'static str] {
        match self.series() {
            Series::Any => &["pip3", "pip2", "pip"],
            Series::Python3 => &["pip3", "pip"],
            Series::Python2 => &["pip2", "pip"],
        }
    }

    fn interpreter(&self, executor: &dyn Executor) -> Result<PathBuf> {
        find_runtime(executor, "Python", self.interpreter_candidates())
    }
}

impl LanguageInstaller for PythonInstaller {
    fn install_dependencies(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        _commands: &[Command],
    ) -> Result<()> {
        let python = self.interpreter(executor)?;
        check_version(
            executor,
            &python,
            &VersionProbe {
                runtime: "Python",
                args: &["--version"],
                pattern: &PYTHON_VERSION,
            },
            &self.constraint,
        )?;

        if !executor.file_exists(&package_dir.join("requirements.txt")) {
            return Ok(());
        }

        let pip = find_package_manager(executor, "pip", self.pip_candidates())?;
        let install = ToolCommand::new(pip)
            .args(["install", "--user", "--ignore-installed", "-r", "requirements.txt"])
            .current_dir(package_dir)
            .env(USER_BASE_ENV, package_dir.as_os_str());
        run_package_manager(executor, "pip", &install)
    }

    fn resolve_invocation(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        executable: &Path,
    ) -> Result<Invocation> {
        let python = self.interpreter(executor)?;
        let mut invocation = Invocation::interpreted(&python, executable);
        invocation
            .env
            .push((USER_BASE_ENV.to_string(), package_dir.as_os_str().to_os_string()));
        Ok(invocation)
    }

    /// Dependencies are missing when requirements exist but pip never populated the user base
    fn needs_reinstall(&self, executor: &dyn Executor, package_dir: &Path) -> bool {
        if !executor.file_exists(&package_dir.join("requirements.txt")) {
            return false;
        }
        if executor.file_exists(&package_dir.join("lib")) {
            return false;
        }

        let has_windows_site = std::fs::read_dir(package_dir)
            .map(|entries| {
                entries.flatten().any(|entry| {
                    entry.path().is_dir() && entry.file_name().to_string_lossy().starts_with("Python")
                })
            })
            .unwrap_or(false);
        !has_windows_site
    }
}
