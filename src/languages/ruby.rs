//! Ruby packages; dependencies via Bundler

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::runtime::{
    VersionProbe, check_version, find_package_manager, find_runtime, run_package_manager,
};
use super::{Constraint, Invocation, LanguageInstaller};
use crate::error::Result;
use crate::exec::{Executor, ToolCommand};
use crate::manifest::Command;

static RUBY_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?m)^ruby (\d+(?:\.\d+)*)").unwrap()
});

pub struct RubyInstaller {
    constraint: Constraint,
}

impl RubyInstaller {
    pub fn new(constraint: Constraint) -> Self {
        Self { constraint }
    }
}

impl LanguageInstaller for RubyInstaller {
    fn install_dependencies(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        _commands: &[Command],
    ) -> Result<()> {
        let ruby = find_runtime(executor, "Ruby", &["ruby"])?;
        check_version(
            executor,
            &ruby,
            &VersionProbe {
                runtime: "Ruby",
                args: &["-v"],
                pattern: &RUBY_VERSION,
            },
            &self.constraint,
        )?;

        if !executor.file_exists(&package_dir.join("Gemfile")) {
            return Ok(());
        }

        let bundler = find_package_manager(executor, "bundler", &["bundle"])?;
        let install = ToolCommand::new(bundler)
            .arg("install")
            .current_dir(package_dir);
        run_package_manager(executor, "bundler", &install)
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
