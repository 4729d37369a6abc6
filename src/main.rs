//! Akamai CLI
//!
//! A single entry point that dispatches to command packages installed from
//! git repositories. Packages declare their commands and runtime in a
//! `cli.json` manifest; their dependencies are installed with the package
//! manager of that runtime.

use std::ffi::OsString;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod git;
mod host;
mod http;
mod languages;
mod manifest;
mod operations;
mod paths;
mod resolver;
mod terminal;
mod upgrade;
mod version;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

/// Environment variable holding the log filter
const LOG_ENV: &str = "AKAMAI_LOG";

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let args: Vec<OsString> = std::env::args_os().collect();
    let cli = Cli::parse_from(&args);

    if !cli.command.is_upgrade() {
        if let Some(code) = commands::upgrade::check_on_startup(&args) {
            std::process::exit(code);
        }
    }

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(args),
        Commands::Update(args) => commands::update::run(args),
        Commands::Uninstall(args) => commands::uninstall::run(args),
        Commands::List => commands::list::run(),
        Commands::Search(args) => commands::search::run(args),
        Commands::Upgrade => commands::upgrade::run(),
        Commands::Config(args) => commands::config::run(args),
        Commands::Completions(args) => commands::completions::run(args),
        Commands::Version => commands::version::run(),
        Commands::External(args) => match commands::external::run(args) {
            Ok(code) => std::process::exit(code),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
