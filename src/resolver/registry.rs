//! Registered commands and name collision detection
//!
//! Installed packages are only guaranteed unique at the fully qualified
//! `package/command` level. A bare name or alias shared by commands of
//! different packages is rejected when it is invoked, never at install time.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{AkamaiError, Result};
use crate::manifest::{self, Command, PackageManifest};
use crate::paths::{CliPaths, package_name};

/// A command known to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredCommand {
    /// Owning package name, `None` for built-ins
    pub package: Option<String>,

    /// Owning package directory, `None` for built-ins
    pub package_dir: Option<PathBuf>,

    pub command: Command,
}

impl RegisteredCommand {
    pub fn builtin(command: Command) -> Self {
        Self {
            package: None,
            package_dir: None,
            command,
        }
    }

    pub fn installed(package_dir: &Path, command: Command) -> Self {
        Self {
            package: Some(package_name(package_dir)),
            package_dir: Some(package_dir.to_path_buf()),
            command,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.package.is_none()
    }

    /// `package/command` for installed commands, the bare name for built-ins
    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}/{}", self.command.name),
            None => self.command.name.clone(),
        }
    }

    /// Whether `name` invokes this command: its name, an alias or its qualified name
    pub fn answers_to(&self, name: &str) -> bool {
        self.command.answers_to(name) || self.qualified_name().eq_ignore_ascii_case(name)
    }
}

/// All commands available for dispatch
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: Vec<RegisteredCommand>,
}

impl Registry {
    pub fn new(commands: Vec<RegisteredCommand>) -> Self {
        Self { commands }
    }

    /// Built-ins followed by the commands of every installed package.
    ///
    /// A package whose manifest cannot be read is skipped with a warning so
    /// one broken package does not disable the whole CLI.
    pub fn load(paths: &CliPaths, builtins: Vec<Command>) -> Self {
        let mut commands: Vec<RegisteredCommand> =
            builtins.into_iter().map(RegisteredCommand::builtin).collect();

        for (package_dir, manifest) in installed_packages(paths) {
            commands.extend(
                manifest
                    .commands
                    .into_iter()
                    .map(|c| RegisteredCommand::installed(&package_dir, c)),
            );
        }

        Self { commands }
    }

    pub fn commands(&self) -> &[RegisteredCommand] {
        &self.commands
    }

    /// Commands contributed by installed packages
    pub fn installed(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.commands.iter().filter(|c| !c.is_builtin())
    }

    /// The command `name` refers to.
    ///
    /// Built-ins win over installed commands. Among installed commands,
    /// matches whose qualified names differ make `name` ambiguous; matches
    /// sharing one qualified name are the same command seen twice.
    pub fn lookup(&self, name: &str) -> Result<Option<&RegisteredCommand>> {
        if let Some(builtin) = self
            .commands
            .iter()
            .find(|c| c.is_builtin() && c.answers_to(name))
        {
            return Ok(Some(builtin));
        }

        let matches: Vec<&RegisteredCommand> =
            self.installed().filter(|c| c.answers_to(name)).collect();

        let mut qualified: Vec<String> = matches.iter().map(|c| c.qualified_name()).collect();
        qualified.sort();
        qualified.dedup();

        if qualified.len() > 1 {
            return Err(AkamaiError::AmbiguousCommand {
                command: name.to_string(),
                candidates: qualified.join(", "),
            });
        }

        Ok(matches.into_iter().next())
    }
}

/// Installed package directories with their manifests
pub fn installed_packages(paths: &CliPaths) -> Vec<(PathBuf, PackageManifest)> {
    paths
        .package_dirs()
        .into_iter()
        .filter_map(|dir| match manifest::read_manifest(&dir) {
            Ok(manifest) => Some((dir, manifest)),
            Err(e) => {
                warn!(package = %dir.display(), error = %e, "skipping package");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_temp_dir, write_files};

    fn command(name: &str, aliases: &[&str]) -> Command {
        Command {
            name: name.to_string(),
            aliases: aliases.iter().map(ToString::to_string).collect(),
            ..Command::default()
        }
    }

    fn firewall_packages() -> Registry {
        Registry::new(vec![
            RegisteredCommand::builtin(command("install", &["get"])),
            RegisteredCommand::installed(
                Path::new("/src/cli-firewall"),
                command("firewall", &["fw"]),
            ),
            RegisteredCommand::installed(
                Path::new("/src/cli-firewall2"),
                command("firewall", &["fw"]),
            ),
        ])
    }

    #[test]
    fn test_alias_shared_across_packages_is_ambiguous() {
        let registry = firewall_packages();
        let err = registry.lookup("fw").unwrap_err();
        assert!(matches!(
            err,
            AkamaiError::AmbiguousCommand { ref candidates, .. }
                if candidates == "firewall/firewall, firewall2/firewall"
        ));
        assert!(registry.lookup("firewall").is_err());
    }

    #[test]
    fn test_qualified_name_is_not_ambiguous() {
        let registry = firewall_packages();
        let found = registry.lookup("firewall2/firewall").unwrap().unwrap();
        assert_eq!(found.package.as_deref(), Some("firewall2"));

        let found = registry.lookup("firewall/firewall").unwrap().unwrap();
        assert_eq!(found.package_dir.as_deref(), Some(Path::new("/src/cli-firewall")));
    }

    #[test]
    fn test_same_qualified_name_is_not_a_collision() {
        let registry = Registry::new(vec![
            RegisteredCommand::installed(Path::new("/src/cli-echo"), command("echo", &["e"])),
            RegisteredCommand::installed(Path::new("/other/cli-echo"), command("echo", &["e"])),
        ]);
        let found = registry.lookup("e").unwrap().unwrap();
        assert_eq!(found.qualified_name(), "echo/echo");
    }

    #[test]
    fn test_builtins_take_precedence() {
        let registry = Registry::new(vec![
            RegisteredCommand::builtin(command("list", &["ls"])),
            RegisteredCommand::installed(Path::new("/src/cli-files"), command("ls", &[])),
        ]);
        assert!(registry.lookup("ls").unwrap().unwrap().is_builtin());
        assert!(!registry.lookup("files/ls").unwrap().unwrap().is_builtin());
    }

    #[test]
    fn test_unknown_name() {
        assert!(firewall_packages().lookup("purge").unwrap().is_none());
    }

    #[test]
    fn test_load_reads_installed_manifests() {
        let temp = create_temp_dir();
        let paths = CliPaths::new(temp.path());
        write_files(
            &paths.packages_dir.join("cli-purge"),
            &[("cli.json", r#"{"commands":[{"name":"Purge","aliases":["p"]}]}"#)],
        );
        write_files(&paths.packages_dir.join("cli-broken"), &[("cli.json", "[")]);

        let registry = Registry::load(&paths, vec![command("list", &[])]);
        let installed: Vec<String> = registry.installed().map(RegisteredCommand::qualified_name).collect();
        assert_eq!(installed, vec!["purge/purge"]);
        assert_eq!(registry.commands().len(), 2);
        assert!(registry.lookup("p").unwrap().is_some());
    }
}
