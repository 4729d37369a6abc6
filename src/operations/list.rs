//! List operation: built-in and installed commands

use console::style;

use super::OperationContext;
use crate::resolver::{RegisteredCommand, Registry};

pub struct ListOperation<'a> {
    ctx: &'a OperationContext<'a>,
}

impl<'a> ListOperation<'a> {
    pub fn new(ctx: &'a OperationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Print every command of `registry`, built-ins first, installed commands grouped by package
    pub fn execute(&self, registry: &Registry) {
        let terminal = self.ctx.terminal;

        terminal.writeln(&style("Built-in commands:").bold().to_string());
        for command in registry.commands().iter().filter(|c| c.is_builtin()) {
            terminal.writeln(&describe(command));
        }

        if registry.installed().next().is_none() {
            terminal.writeln("");
            terminal.writeln("No packages installed. Use \"akamai search\" to find packages.");
            return;
        }
        self.print_installed(registry);
    }

    /// Print the installed commands of `registry`, one block per package
    pub fn print_installed(&self, registry: &Registry) {
        let terminal = self.ctx.terminal;

        let mut current_package: Option<&str> = None;
        for command in registry.installed() {
            let package = command.package.as_deref().unwrap_or_default();
            if current_package != Some(package) {
                terminal.writeln("");
                terminal.writeln(
                    &style(format!("Installed commands ({package}):"))
                        .bold()
                        .to_string(),
                );
                current_package = Some(package);
            }
            terminal.writeln(&describe(command));
        }
    }
}

fn describe(registered: &RegisteredCommand) -> String {
    let command = &registered.command;
    let mut line = format!("  {}", style(&command.name).green());
    if !command.aliases.is_empty() {
        let label = if command.aliases.len() == 1 { "alias" } else { "aliases" };
        line.push_str(&format!(" ({label}: {})", command.aliases.join(", ")));
    }
    if !command.description.is_empty() {
        line.push_str(&format!("\n    {}", command.description));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Command;
    use crate::operations::test_support::context;
    use crate::paths::CliPaths;
    use crate::test_fixtures::{ScriptedExecutor, ScriptedTerminal, StaticFetcher, create_temp_dir};
    use std::path::Path;

    fn command(name: &str, aliases: &[&str], description: &str) -> Command {
        Command {
            name: name.to_string(),
            aliases: aliases.iter().map(ToString::to_string).collect(),
            description: description.to_string(),
            ..Command::default()
        }
    }

    #[test]
    fn test_list_groups_by_package() {
        console::set_colors_enabled(false);
        let home = create_temp_dir();
        let paths = CliPaths::new(home.path());
        let (executor, terminal, fetcher) =
            (ScriptedExecutor::new(), ScriptedTerminal::new(), StaticFetcher::new());
        let ctx = context(&paths, &executor, &terminal, &fetcher);

        let registry = Registry::new(vec![
            RegisteredCommand::builtin(command("install", &["get"], "Fetch and install packages")),
            RegisteredCommand::installed(
                Path::new("/src/cli-purge"),
                command("purge", &["p", "fast-purge"], "Purge content"),
            ),
        ]);
        ListOperation::new(&ctx).execute(&registry);

        let lines = terminal.lines();
        assert_eq!(lines[0], "Built-in commands:");
        assert_eq!(lines[1], "  install (alias: get)\n    Fetch and install packages");
        assert!(lines.contains(&"Installed commands (purge):".to_string()));
        assert!(lines.contains(&"  purge (aliases: p, fast-purge)\n    Purge content".to_string()));
    }

    #[test]
    fn test_list_without_packages() {
        let home = create_temp_dir();
        let paths = CliPaths::new(home.path());
        let (executor, terminal, fetcher) =
            (ScriptedExecutor::new(), ScriptedTerminal::new(), StaticFetcher::new());
        let ctx = context(&paths, &executor, &terminal, &fetcher);

        ListOperation::new(&ctx).execute(&Registry::default());
        assert!(terminal.printed("No packages installed"));
    }
}
