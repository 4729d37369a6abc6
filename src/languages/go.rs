//! Go packages: module dependencies and one compiled binary per command

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use super::runtime::{VersionProbe, check_version, find_runtime, run_package_manager};
use super::{Constraint, Invocation, LanguageInstaller};
use crate::error::{AkamaiError, Result};
use crate::exec::{Executor, ToolCommand};
use crate::host;
use crate::manifest::Command;

static GO_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"go version go(\S+)\s").unwrap()
});

pub struct GoInstaller {
    constraint: Constraint,
}

impl GoInstaller {
    pub fn new(constraint: Constraint) -> Self {
        Self { constraint }
    }

    fn install_modules(executor: &dyn Executor, go: &Path, package_dir: &Path) -> Result<()> {
        if !executor.file_exists(&package_dir.join("go.mod")) {
            let module = package_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "akamai-package".to_string());
            let init = ToolCommand::new(go)
                .args(["mod", "init"])
                .arg(module)
                .current_dir(package_dir);
            run_package_manager(executor, "go modules", &init)?;
        }

        let tidy = ToolCommand::new(go)
            .args(["mod", "tidy"])
            .current_dir(package_dir);
        run_package_manager(executor, "go modules", &tidy)
    }
}

/// Binary name produced for `command`
pub fn binary_name(command: &str) -> String {
    format!("akamai-{}{}", command.to_lowercase(), host::binary_suffix())
}

impl LanguageInstaller for GoInstaller {
    fn install_dependencies(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        commands: &[Command],
    ) -> Result<()> {
        let go = find_runtime(executor, "Go", &["go"])?;
        check_version(
            executor,
            &go,
            &VersionProbe {
                runtime: "Go",
                args: &["version"],
                pattern: &GO_VERSION,
            },
            &self.constraint,
        )?;

        Self::install_modules(executor, &go, package_dir)?;

        for command in commands {
            let output_name = binary_name(&command.name);
            let mut build = ToolCommand::new(&go).arg("build");
            if !command.ld_flags.trim().is_empty() {
                build = build.arg("-ldflags").arg(command.ld_flags.trim());
            }
            let build = build
                .args(["-o", output_name.as_str(), "."])
                .current_dir(package_dir);

            info!(command = %command.name, output = %output_name, "building go command");
            let output = executor
                .run(&build)
                .map_err(|e| AkamaiError::PackageCompileFailure {
                    command: command.name.clone(),
                    reason: e.to_string(),
                })?;
            if !output.success {
                return Err(AkamaiError::PackageCompileFailure {
                    command: command.name.clone(),
                    reason: output.failure_reason(),
                });
            }
        }

        Ok(())
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
