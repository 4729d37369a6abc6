//! Error types and handling for the Akamai CLI
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Variants are grouped by the area that raises them:
//! - manifest: reading `cli.json`
//! - resolve: locating executables and detecting alias collisions
//! - runtime / package manager: language toolchains and dependency installs
//! - package: install/update/uninstall preconditions
//! - git: clone, open and pull
//! - upgrade: self-upgrade download, checksum and binary replacement
//! - config / fs / http: ambient failures

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Akamai CLI operations
#[derive(Error, Diagnostic, Debug)]
pub enum AkamaiError {
    // Manifest errors
    #[error("Package manifest (cli.json) not found in {path}")]
    #[diagnostic(
        code(akamai::manifest::not_found),
        help("A package must contain a cli.json at its root")
    )]
    ManifestNotFound { path: String },

    #[error("Invalid package manifest {path}: {reason}")]
    #[diagnostic(code(akamai::manifest::invalid))]
    ManifestInvalid { path: String, reason: String },

    // Resolution errors
    #[error("Executable for command \"{command}\" not found")]
    #[diagnostic(
        code(akamai::resolve::executable_not_found),
        help("Run 'akamai list' to see installed commands")
    )]
    ExecutableNotFound { command: String },

    #[error("Command \"{command}\" is ambiguous, it matches: {candidates}")]
    #[diagnostic(
        code(akamai::resolve::ambiguous),
        help("Use the fully qualified <package>/<command> form instead")
    )]
    AmbiguousCommand { command: String, candidates: String },

    #[error("Command \"{command}\" not found. Try \"akamai help\".")]
    #[diagnostic(code(akamai::resolve::command_not_found))]
    CommandNotFound { command: String },

    // Runtime errors
    #[error("Unable to locate {runtime} runtime")]
    #[diagnostic(
        code(akamai::runtime::not_found),
        help("Install the runtime and make sure it is on your PATH")
    )]
    RuntimeNotFound { runtime: String },

    #[error("Unable to determine installed version of {runtime}")]
    #[diagnostic(code(akamai::runtime::no_version_found))]
    RuntimeNoVersionFound { runtime: String },

    #[error("{runtime} {required} is required to install this package, found {installed}")]
    #[diagnostic(code(akamai::runtime::minimum_version_required))]
    RuntimeMinimumVersionRequired {
        runtime: String,
        required: String,
        installed: String,
    },

    // Package manager errors
    #[error("Unable to locate package manager ({manager}) in PATH")]
    #[diagnostic(code(akamai::package_manager::not_found))]
    PackageManagerNotFound { manager: String },

    #[error("Unable to run package manager ({manager}): {reason}")]
    #[diagnostic(code(akamai::package_manager::exec))]
    PackageManagerExec { manager: String, reason: String },

    #[error("Unable to build binary ({command}): {reason}")]
    #[diagnostic(code(akamai::package::compile_failure))]
    PackageCompileFailure { command: String, reason: String },

    // Package lifecycle errors
    #[error("Package directory already exists ({path})")]
    #[diagnostic(
        code(akamai::package::already_exists),
        help("Use 'akamai update' to update an installed package")
    )]
    PackageAlreadyExists { path: String },

    #[error("Unable to uninstall \"{command}\", was it installed using \"akamai install\"?")]
    #[diagnostic(code(akamai::package::not_installed))]
    NotInstalled { command: String },

    #[error("Invalid repository reference: {reference}")]
    #[diagnostic(
        code(akamai::package::invalid_repository),
        help("Valid formats: name, owner/repo, https://host/owner/repo.git, git@host:owner/repo.git")
    )]
    InvalidRepository { reference: String },

    #[error("Unable to download binary for command \"{command}\": {reason}")]
    #[diagnostic(code(akamai::package::binary_download_failed))]
    BinaryDownloadFailed { command: String, reason: String },

    #[error("Unable to update packages: {packages}")]
    #[diagnostic(
        code(akamai::package::update_failed),
        help("The remaining packages were updated; see the warnings above")
    )]
    UpdateFailed { packages: String },

    // Git errors
    #[error("Unable to clone repository {url}: {reason}")]
    #[diagnostic(
        code(akamai::git::clone_failed),
        help("Check that the URL is correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to open repository at '{path}': {reason}")]
    #[diagnostic(code(akamai::git::open_failed))]
    GitOpenFailed { path: String, reason: String },

    #[error("Unable to fetch updates: {reason}")]
    #[diagnostic(code(akamai::git::fetch_failed))]
    FetchFailed { reason: String },

    // Self-upgrade errors
    #[error("Checksums do not match, please try again")]
    #[diagnostic(code(akamai::upgrade::checksum_mismatch))]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Unable to install or rollback, please re-install: {reason}")]
    #[diagnostic(code(akamai::upgrade::rollback_failed))]
    RollbackFailed { reason: String },

    #[error("Unable to upgrade: {reason}")]
    #[diagnostic(code(akamai::upgrade::failed))]
    UpgradeFailed { reason: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(akamai::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to write configuration file: {path}")]
    #[diagnostic(code(akamai::config::write_failed))]
    ConfigWriteFailed { path: String, reason: String },

    #[error("Invalid configuration key \"{key}\"")]
    #[diagnostic(
        code(akamai::config::invalid_key),
        help("Keys use the <section>.<key> form, e.g. cli.last-upgrade-check")
    )]
    ConfigInvalidKey { key: String },

    // Network errors
    #[error("HTTP request to {url} failed: {reason}")]
    #[diagnostic(code(akamai::http::failed))]
    HttpFailed { url: String, reason: String },

    // Terminal errors
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(akamai::terminal::prompt))]
    Prompt { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(akamai::fs::io_error))]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AkamaiError {
    /// Wrap an IO error with the operation that produced it
    pub fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        AkamaiError::Io {
            message: format!("{context}: {err}"),
            source: Some(err),
        }
    }
}

impl From<std::io::Error> for AkamaiError {
    fn from(err: std::io::Error) -> Self {
        AkamaiError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for AkamaiError {
    fn from(err: serde_yaml::Error) -> Self {
        AkamaiError::ConfigReadFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AkamaiError {
    fn from(err: serde_json::Error) -> Self {
        AkamaiError::ManifestInvalid {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for AkamaiError {
    fn from(err: git2::Error) -> Self {
        AkamaiError::FetchFailed {
            reason: err.message().to_string(),
        }
    }
}

impl From<reqwest::Error> for AkamaiError {
    fn from(err: reqwest::Error) -> Self {
        AkamaiError::HttpFailed {
            url: err
                .url()
                .map_or_else(|| "unknown".to_string(), ToString::to_string),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for AkamaiError {
    fn from(err: inquire::InquireError) -> Self {
        AkamaiError::Prompt {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AkamaiError>;
