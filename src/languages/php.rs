//! PHP packages; dependencies via Composer

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::runtime::{VersionProbe, check_version, find_binary, find_runtime, run_package_manager};
use super::{Constraint, Invocation, LanguageInstaller};
use crate::error::{AkamaiError, Result};
use crate::exec::{Executor, ToolCommand};
use crate::manifest::Command;

static PHP_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?m)^PHP (\d+\.\d+\.\d+)").unwrap()
});

pub struct PhpInstaller {
    constraint: Constraint,
}

impl PhpInstaller {
    pub fn new(constraint: Constraint) -> Self {
        Self { constraint }
    }

    /// Composer invocation: in-repo `composer.phar`, then `composer`, then `composer.phar` on PATH
    fn composer_command(
        executor: &dyn Executor,
        php: &Path,
        package_dir: &Path,
    ) -> Result<ToolCommand> {
        let bundled = package_dir.join("composer.phar");
        if executor.file_exists(&bundled) {
            return Ok(ToolCommand::new(php).arg(bundled.into_os_string()));
        }

        find_binary(executor, &["composer", "composer.phar"])
            .map(ToolCommand::new)
            .ok_or_else(|| AkamaiError::PackageManagerNotFound {
                manager: "composer".to_string(),
            })
    }
}

impl LanguageInstaller for PhpInstaller {
    fn install_dependencies(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        _commands: &[Command],
    ) -> Result<()> {
        let php = find_runtime(executor, "PHP", &["php"])?;
        check_version(
            executor,
            &php,
            &VersionProbe {
                runtime: "PHP",
                args: &["-v"],
                pattern: &PHP_VERSION,
            },
            &self.constraint,
        )?;

        if !executor.file_exists(&package_dir.join("composer.json")) {
            return Ok(());
        }

        let install = Self::composer_command(executor, &php, package_dir)?
            .arg("install")
            .current_dir(package_dir);
        run_package_manager(executor, "composer", &install)
    }

    fn resolve_invocation(
        &self,
        _executor: &dyn Executor,
        _package_dir: &Path,
        executable: &Path,
    ) -> Result<Invocation> {
        Ok(Invocation::direct(executable))
    }
}
