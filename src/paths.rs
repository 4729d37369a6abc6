//! CLI home layout
//!
//! ```text
//! $AKAMAI_CLI_HOME/            (defaults to the user's home directory)
//! └── .akamai-cli/
//!     ├── config.yaml
//!     └── src/                 installed packages, one directory each
//!         └── cli-<name>/
//! ```

use std::path::{Path, PathBuf};

use crate::error::{AkamaiError, Result};

/// Environment variable overriding the CLI home directory
pub const HOME_ENV: &str = "AKAMAI_CLI_HOME";

const CLI_DIR: &str = ".akamai-cli";
const SRC_DIR: &str = "src";
const CONFIG_FILE: &str = "config.yaml";

/// Resolved locations used by the CLI
#[derive(Debug, Clone)]
pub struct CliPaths {
    /// `AKAMAI_CLI_HOME` or the user's home directory
    pub home: PathBuf,
    /// `<home>/.akamai-cli`
    pub cli_dir: PathBuf,
    /// Root directory of installed packages
    pub packages_dir: PathBuf,
    /// Persisted configuration file
    pub config_file: PathBuf,
}

impl CliPaths {
    /// Resolve from `AKAMAI_CLI_HOME`, falling back to the home directory
    pub fn from_env() -> Result<Self> {
        let home = match std::env::var_os(HOME_ENV) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => dirs::home_dir().ok_or_else(|| AkamaiError::Io {
                message: format!("Unable to determine home directory, set {HOME_ENV}"),
                source: None,
            })?,
        };
        Ok(Self::new(home))
    }

    /// Layout rooted at `home`
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let cli_dir = home.join(CLI_DIR);
        Self {
            packages_dir: cli_dir.join(SRC_DIR),
            config_file: cli_dir.join(CONFIG_FILE),
            cli_dir,
            home,
        }
    }

    /// Create the packages directory if missing
    pub fn ensure_packages_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.packages_dir).map_err(|e| {
            AkamaiError::io(
                format!("Unable to create {}", self.packages_dir.display()),
                e,
            )
        })?;
        Ok(&self.packages_dir)
    }

    /// Installed package directories, sorted by name
    pub fn package_dirs(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.packages_dir) else {
            return Vec::new();
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        dirs
    }
}

/// Package name of an installed package directory (`cli-purge` → `purge`)
pub fn package_name(package_dir: &Path) -> String {
    let dir_name = package_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    dir_name
        .strip_prefix("cli-")
        .map_or_else(|| dir_name.clone(), ToString::to_string)
}
