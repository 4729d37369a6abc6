//! CLI definitions using clap derive API
//!
//! Argument types live in one submodule per built-in command. Anything that
//! is not a built-in is captured by [`Commands::External`] and dispatched to
//! an installed package.

use std::ffi::OsString;

use clap::builder::{Styles, styling::AnsiColor};
use clap::{CommandFactory, Parser, Subcommand};

pub mod completions;
pub mod config;
pub mod install;
pub mod search;
pub mod uninstall;
pub mod update;

pub use completions::CompletionsArgs;
pub use config::{ConfigArgs, ConfigSubcommand};
pub use install::InstallArgs;
pub use search::SearchArgs;
pub use uninstall::UninstallArgs;
pub use update::UpdateArgs;

use crate::manifest::Command;

/// Akamai CLI - pluggable command dispatcher
#[derive(Parser, Debug)]
#[command(
    name = "akamai",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Akamai CLI, a single entry point for installable command packages",
    long_about = "Akamai CLI dispatches to commands provided by packages installed from git \
                  repositories. Packages may be written in Go, JavaScript, Python, PHP or Ruby; \
                  their dependencies are installed alongside them.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  akamai install purge           \x1b[90m# Install github.com/akamai/cli-purge\x1b[0m\n   \
                  akamai purge invalidate <url>  \x1b[90m# Run an installed command\x1b[0m\n   \
                  akamai update                  \x1b[90m# Update every installed package\x1b[0m\n   \
                  akamai search dns              \x1b[90m# Find packages\x1b[0m\n"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and install packages from a git repository
    #[command(visible_alias = "get")]
    Install(InstallArgs),

    /// Update one or more commands, or every installed package
    Update(UpdateArgs),

    /// Uninstall the packages providing the given commands
    Uninstall(UninstallArgs),

    /// Display available commands
    List,

    /// Search for packages in the package list
    Search(SearchArgs),

    /// Upgrade Akamai CLI to the latest release
    Upgrade,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Output CLI version
    Version,

    /// An installed command
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

impl Commands {
    pub fn is_upgrade(&self) -> bool {
        matches!(self, Commands::Upgrade)
    }
}

/// Built-in commands as registry entries, taken from the clap definition
pub fn builtin_commands() -> Vec<Command> {
    Cli::command()
        .get_subcommands()
        .filter(|sub| sub.get_name() != "help")
        .map(|sub| Command {
            name: sub.get_name().to_string(),
            aliases: sub.get_visible_aliases().map(ToString::to_string).collect(),
            description: sub
                .get_about()
                .map(ToString::to_string)
                .unwrap_or_default(),
            ..Command::default()
        })
        .collect()
}
