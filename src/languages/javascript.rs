//! JavaScript packages run through Node.js; dependencies via yarn or npm

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::runtime::{
    VersionProbe, check_version, find_binary, find_package_manager, find_runtime,
    run_package_manager,
};
use super::{Constraint, Invocation, LanguageInstaller};
use crate::error::Result;
use crate::exec::{Executor, ToolCommand};
use crate::manifest::Command;

const NODE_BINARIES: &[&str] = &["node", "nodejs"];

static NODE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?m)^v(\S+)\s*$").unwrap()
});

pub struct JavaScriptInstaller {
    constraint: Constraint,
}

impl JavaScriptInstaller {
    pub fn new(constraint: Constraint) -> Self {
        Self { constraint }
    }
}

impl LanguageInstaller for JavaScriptInstaller {
    fn install_dependencies(
        &self,
        executor: &dyn Executor,
        package_dir: &Path,
        _commands: &[Command],
    ) -> Result<()> {
        let node = find_runtime(executor, "Node.js", NODE_BINARIES)?;
        check_version(
            executor,
            &node,
            &VersionProbe {
                runtime: "Node.js",
                args: &["-v"],
                pattern: &NODE_VERSION,
            },
            &self.constraint,
        )?;

        if executor.file_exists(&package_dir.join("yarn.lock")) {
            if let Some(yarn) = find_binary(executor, &["yarn"]) {
                let install = ToolCommand::new(yarn).arg("install").current_dir(package_dir);
                return run_package_manager(executor, "yarn", &install);
            }
        }

        if executor.file_exists(&package_dir.join("package.json")) {
            let npm = find_package_manager(executor, "npm", &["npm"])?;
            let install = ToolCommand::new(npm).arg("install").current_dir(package_dir);
            return run_package_manager(executor, "npm", &install);
        }

        Ok(())
    }

    fn resolve_invocation(
        &self,
        executor: &dyn Executor,
        _package_dir: &Path,
        executable: &Path,
    ) -> Result<Invocation> {
        let node = find_runtime(executor, "Node.js", NODE_BINARIES)?;
        Ok(Invocation::interpreted(&node, executable))
    }
}
