//! Language runtimes for installed packages
//!
//! A package declares at most one runtime in its manifest requirements.
//! [`Language::from_requirements`] turns those requirements into a tagged
//! variant carrying the version constraint, and [`Language::installer`]
//! returns the strategy that knows how to install the package's
//! dependencies and how to invoke one of its commands.
//!
//! Supporting a new runtime means adding a variant and an installer module.

mod go;
mod javascript;
mod php;
mod python;
mod ruby;
mod runtime;

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::exec::Executor;
use crate::manifest::{Command, LanguageRequirements};

pub use go::GoInstaller;
pub use javascript::JavaScriptInstaller;
pub use php::PhpInstaller;
pub use python::PythonInstaller;
pub use ruby::RubyInstaller;

/// A runtime version requirement from the manifest (`""`, `"*"` or a minimum version)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraint(String);

impl Constraint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Minimum version to enforce, `None` when any version is acceptable
    pub fn minimum(&self) -> Option<&str> {
        (!self.0.is_empty() && self.0 != "*").then_some(self.0.as_str())
    }
}

/// Runtime selected for a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    Php(Constraint),
    JavaScript(Constraint),
    Ruby(Constraint),
    Go(Constraint),
    Python(Constraint),
    Undefined,
}

impl Language {
    /// Select the runtime from manifest requirements.
    ///
    /// When several are set the first non-empty in
    /// php > node > ruby > go > python order wins.
    pub fn from_requirements(requirements: &LanguageRequirements) -> Self {
        let candidates: [(&str, fn(Constraint) -> Language); 5] = [
            (requirements.php.as_str(), Language::Php),
            (requirements.node.as_str(), Language::JavaScript),
            (requirements.ruby.as_str(), Language::Ruby),
            (requirements.go.as_str(), Language::Go),
            (requirements.python.as_str(), Language::Python),
        ];

        candidates
            .into_iter()
            .find(|(value, _)| !value.trim().is_empty())
            .map_or(Language::Undefined, |(value, variant)| {
                variant(Constraint::new(value))
            })
    }

    /// Strategy implementing this runtime
    pub fn installer(&self) -> Box<dyn LanguageInstaller> {
        match self {
            Language::Php(c) => Box::new(PhpInstaller::new(c.clone())),
            Language::JavaScript(c) => Box::new(JavaScriptInstaller::new(c.clone())),
            Language::Ruby(c) => Box::new(RubyInstaller::new(c.clone())),
            Language::Go(c) => Box::new(GoInstaller::new(c.clone())),
            Language::Python(c) => Box::new(PythonInstaller::new(c.clone())),
            Language::Undefined => Box::new(UndefinedInstaller),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Php(_) => "php",
            Language::JavaScript(_) => "javascript",
            Language::Ruby(_) => "ruby",
            Language::Go(_) => "go",
            Language::Python(_) => "python",
            Language::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

/// How to run a resolved command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program followed by its leading arguments (e.g. `[node, script.js]`)
    pub argv: Vec<OsString>,

    /// Extra environment for the child process
    pub env: Vec<(String, OsString)>,

    /// Set when the runtime is unknown and the command may not work
    pub warning: Option<String>,
}

impl Invocation {
    /// Run the executable directly
    pub fn direct(executable: &Path) -> Self {
        Self {
            argv: vec![executable.as_os_str().to_os_string()],
            env: Vec::new(),
            warning: None,
        }
    }

    /// Run the executable through an interpreter
    pub fn interpreted(interpreter: &Path, executable: &Path) -> Self {
        Self {
            argv: vec![
                interpreter.as_os_str().to_os_string(),
                executable.as_os_str().to_os_string(),
            ],
            env: Vec::new(),
            warning: None,
        }
    }
}

/// Per-runtime install and invocation strategy
pub trait LanguageInstaller {
    /// Install the package's dependencies and build artifacts
    fn install_dependencies(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        commands: &[Command],
    ) -> Result<()>;

    /// Build the invocation for `executable` belonging to the package at `package_dir`
    fn resolve_invocation(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        executable: &Path,
    ) -> Result<Invocation>;

    /// Whether dependencies are missing and must be installed before running
    fn needs_reinstall(&self, _executor: &dyn Executor, _package_dir: &Path) -> bool {
        false
    }
}

/// Message attached to invocations of packages without a known runtime
pub const UNDEFINED_LANGUAGE_WARNING: &str =
    "Package language is undefined. Package may or may not function correctly.";

/// Packages that declare no runtime: nothing to install, run files directly
pub struct UndefinedInstaller;

impl LanguageInstaller for UndefinedInstaller {
    fn install_dependencies(&self, _: &dyn Executor, _: &Path, _: &[Command]) -> Result<()> {
        Ok(())
    }

    fn resolve_invocation(
        &self,
        _executor: &dyn Executor,
        _package_dir: &Path,
        executable: &Path,
    ) -> Result<Invocation> {
        let mut invocation = Invocation::direct(executable);
        invocation.warning = Some(UNDEFINED_LANGUAGE_WARNING.to_string());
        Ok(invocation)
    }
}
