//! Subprocess execution
//!
//! Language installers never spawn processes or probe the file system
//! directly; they go through [`Executor`] so installs can be exercised
//! without real toolchains.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{AkamaiError, Result};

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub dir: Option<PathBuf>,
    pub env: Vec<(String, OsString)>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program and arguments as one line, for messages
    pub fn display(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    /// Stdout followed by stderr; some tools print their version on stderr
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Best single-line explanation of a failure
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Process and file system access needed by language installers
pub trait Executor {
    /// Locate `name` on the process PATH
    fn look_path(&self, name: &str) -> Option<PathBuf>;

    /// Run `command` to completion, capturing output.
    ///
    /// A non-zero exit is reported through [`ExecOutput::success`], not as an error.
    fn run(&self, command: &ToolCommand) -> Result<ExecOutput>;

    /// Whether `path` exists
    fn file_exists(&self, path: &Path) -> bool;
}

/// Executor that spawns real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn look_path(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn run(&self, command: &ToolCommand) -> Result<ExecOutput> {
        debug!(command = %command.display(), dir = ?command.dir, "running");

        let mut process = Command::new(&command.program);
        process.args(&command.args);
        if let Some(dir) = &command.dir {
            process.current_dir(dir);
        }
        for (key, value) in &command.env {
            process.env(key, value);
        }

        let output = process.output().map_err(|e| {
            AkamaiError::io(format!("Unable to run {}", command.program.display()), e)
        })?;

        Ok(ExecOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_command_builder() {
        let cmd = ToolCommand::new("/usr/bin/go")
            .args(["build", "-o"])
            .arg("akamai-purge")
            .current_dir("/pkg")
            .env("GOPATH", "/go");
        assert_eq!(cmd.display(), "/usr/bin/go build -o akamai-purge");
        assert_eq!(cmd.dir, Some(PathBuf::from("/pkg")));
        assert_eq!(cmd.env, vec![("GOPATH".to_string(), OsString::from("/go"))]);
    }

    #[test]
    fn test_failure_reason_prefers_stderr() {
        let out = ExecOutput {
            success: false,
            stdout: "progress\n".to_string(),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(out.failure_reason(), "boom");

        let out = ExecOutput {
            success: false,
            stdout: "only stdout\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(out.failure_reason(), "only stdout");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_runs_process() {
        let output = SystemExecutor
            .run(&ToolCommand::new("sh").args(["-c", "echo out; echo err 1>&2; exit 3"]))
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }
}
