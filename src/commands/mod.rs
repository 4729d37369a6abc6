//! Command implementations for the Akamai CLI
//!
//! Each module is a thin `run` wrapper that builds the operation for one
//! built-in command from a [`Session`] and reports its result.

pub mod completions;
pub mod config;
pub mod external;
pub mod install;
pub mod list;
pub mod search;
pub mod uninstall;
pub mod update;
pub mod upgrade;
pub mod version;

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{AkamaiError, Result};
use crate::exec::SystemExecutor;
use crate::http::HttpFetcher;
use crate::manifest::BinaryTarget;
use crate::operations::OperationContext;
use crate::paths::CliPaths;
use crate::terminal::ConsoleTerminal;

/// Real collaborators for one CLI invocation
pub struct Session {
    pub paths: CliPaths,
    pub executor: SystemExecutor,
    pub terminal: ConsoleTerminal,
    pub fetcher: HttpFetcher,
}

impl Session {
    /// Collaborators rooted at `AKAMAI_CLI_HOME`
    pub fn open() -> Result<Self> {
        Ok(Self {
            paths: CliPaths::from_env()?,
            executor: SystemExecutor,
            terminal: ConsoleTerminal::new(),
            fetcher: HttpFetcher::new()?,
        })
    }

    pub fn context(&self) -> OperationContext<'_> {
        OperationContext {
            paths: &self.paths,
            executor: &self.executor,
            terminal: &self.terminal,
            fetcher: &self.fetcher,
            target: BinaryTarget::host(),
        }
    }
}

/// Run `program` with inherited stdio and return its exit code
pub fn passthrough(
    program: &Path,
    args: &[OsString],
    env: &[(String, OsString)],
) -> Result<i32> {
    debug!(program = %program.display(), ?args, "spawning");

    let status = Command::new(program)
        .args(args)
        .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_os_str())))
        .status()
        .map_err(|e| AkamaiError::io(format!("Unable to run {}", program.display()), e))?;

    // Killed by a signal: no code to forward
    Ok(status.code().unwrap_or(1))
}
