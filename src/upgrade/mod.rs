//! Self-upgrade
//!
//! ```text
//! Idle → CheckingVersion → UpToDate
//!                        → DownloadPending → Downloading → VerifyingChecksum
//!                                                        → Applying → Relaunching
//!                                                        → ChecksumMismatch (abort)
//! ```
//!
//! The engine never re-executes anything itself. A successful upgrade ends
//! in [`UpgradeOutcome::Relaunch`] and the caller runs the new binary.

mod checksum;
mod replace;

use std::ffi::OsString;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::config::{CLI_SECTION, ConfigStore, LAST_UPGRADE_CHECK};
use crate::error::{AkamaiError, Result};
use crate::http::Fetcher;
use crate::manifest::BinaryTarget;
use crate::terminal::Terminal;
use crate::version::{self, Comparison};

use replace::replace_executable;

/// Release repository used when `CLI_REPOSITORY` is not set
pub const DEFAULT_REPOSITORY: &str = "https://github.com/akamai/cli";

/// Environment variable overriding the release repository
pub const REPOSITORY_ENV: &str = "CLI_REPOSITORY";

/// Config value disabling automatic checks
pub const CHECK_IGNORE: &str = "ignore";

/// Config value of an enabled check that has never run
pub const CHECK_NEVER: &str = "never";

/// Minimum time between automatic checks
pub fn check_interval() -> Duration {
    Duration::hours(24)
}

/// Release repository, honouring [`REPOSITORY_ENV`]
pub fn repository() -> String {
    std::env::var(REPOSITORY_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Automatic check status derived from `cli.last-upgrade-check`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckSchedule {
    /// The user never answered whether checks should run
    Unconfigured,
    /// Checks are disabled
    Disabled,
    /// Checked within the last interval
    NotDue,
    /// A check should run now
    Due,
}

/// Decide whether an automatic check is due at `now`
pub fn schedule(config: &dyn ConfigStore, now: DateTime<Utc>) -> CheckSchedule {
    let value = config
        .get(CLI_SECTION, LAST_UPGRADE_CHECK)
        .unwrap_or_default();

    match value.trim() {
        "" => CheckSchedule::Unconfigured,
        CHECK_IGNORE => CheckSchedule::Disabled,
        CHECK_NEVER => CheckSchedule::Due,
        timestamp => match DateTime::parse_from_rfc3339(timestamp) {
            Ok(last) if now.signed_duration_since(last) < check_interval() => {
                CheckSchedule::NotDue
            }
            Ok(_) => CheckSchedule::Due,
            Err(e) => {
                debug!(timestamp, error = %e, "unreadable last check time");
                CheckSchedule::Due
            }
        },
    }
}

/// Record that a check ran at `now`
pub fn record_check(config: &mut dyn ConfigStore, now: DateTime<Utc>) -> Result<()> {
    config.set(CLI_SECTION, LAST_UPGRADE_CHECK, &now.to_rfc3339());
    config.save()
}

/// Terminal state of an upgrade attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// No newer release exists or it could not be determined
    UpToDate,
    /// A newer release exists but the user chose not to install it
    Declined { latest: String },
    /// The binary was replaced; run `executable` with `args` and exit with its status
    Relaunch {
        executable: PathBuf,
        args: Vec<OsString>,
    },
}

/// Checks for, downloads and applies new releases
pub struct Upgrader<'a> {
    fetcher: &'a dyn Fetcher,
    terminal: &'a dyn Terminal,
    repository: String,
    current_version: String,
    executable: PathBuf,
    target: BinaryTarget,
}

impl<'a> Upgrader<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        terminal: &'a dyn Terminal,
        repository: String,
        current_version: &str,
        executable: PathBuf,
        target: BinaryTarget,
    ) -> Self {
        Self {
            fetcher,
            terminal,
            repository,
            current_version: current_version.to_string(),
            executable,
            target,
        }
    }

    /// Tag of the latest published release, taken from the `releases/latest` redirect
    pub fn latest_version(&self) -> Result<Option<String>> {
        let url = format!("{}/releases/latest", self.repository);
        let location = self.fetcher.redirect_location(&url)?;

        Ok(location.and_then(|location| {
            location
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|tag| !tag.is_empty())
                .map(ToString::to_string)
        }))
    }

    /// Newer release than the running one, if any
    pub fn check(&self) -> Result<Option<String>> {
        debug!(state = "CheckingVersion", current = %self.current_version);
        let Some(latest) = self.latest_version()? else {
            return Ok(None);
        };

        match version::compare(&latest, &self.current_version) {
            Comparison::Greater => {
                debug!(state = "DownloadPending", latest);
                Ok(Some(latest))
            }
            Comparison::Equal | Comparison::Smaller => {
                debug!(state = "UpToDate", latest);
                Ok(None)
            }
            Comparison::Error => {
                debug!(state = "UpToDate", latest, "unable to compare versions");
                Ok(None)
            }
        }
    }

    /// Download URL of the release binary for `version`
    pub fn download_url(&self, version: &str) -> String {
        format!(
            "{}/releases/download/{version}/akamai-{version}-{}{}{}",
            self.repository, self.target.os, self.target.arch, self.target.bin_suffix
        )
    }

    /// Download `version`, verify it and swap it in for the running binary
    pub fn apply(&self, version: &str) -> Result<()> {
        let url = self.download_url(version);
        debug!(state = "Downloading", url);
        let binary = self.fetcher.get(&url)?;
        let signature = self.fetcher.get(&format!("{url}.sig"))?;
        let signature = String::from_utf8(signature).map_err(|e| AkamaiError::UpgradeFailed {
            reason: format!("invalid checksum signature: {e}"),
        })?;

        debug!(state = "VerifyingChecksum", bytes = binary.len());
        replace_executable(&self.executable, &binary, &signature)?;
        info!(state = "Applied", version, "upgraded");
        Ok(())
    }

    /// Run the whole flow.
    ///
    /// Unless `forced`, the user is asked before downloading. `args` is the
    /// command line to relaunch with once the new binary is in place.
    pub fn run(&self, forced: bool, args: Vec<OsString>) -> Result<UpgradeOutcome> {
        let Some(latest) = self.check()? else {
            return Ok(UpgradeOutcome::UpToDate);
        };

        if !forced {
            let prompt = format!(
                "New upgrade found: {latest} (you are running: {}). Upgrade now?",
                self.current_version
            );
            if !self.terminal.confirm(&prompt, false)? {
                return Ok(UpgradeOutcome::Declined { latest });
            }
        }

        self.terminal
            .spinner_start(&format!("Upgrading Akamai CLI to {latest}"));
        if let Err(e) = self.apply(&latest) {
            self.terminal.spinner_fail();
            return Err(e);
        }
        self.terminal.spinner_ok();

        debug!(state = "Relaunching");
        Ok(UpgradeOutcome::Relaunch {
            executable: self.executable.clone(),
            args,
        })
    }
}
