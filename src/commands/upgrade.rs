//! Upgrade command and the automatic upgrade check

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, warn};

use crate::commands::{Session, passthrough};
use crate::config::{CLI_SECTION, ConfigStore, FileConfig, LAST_UPGRADE_CHECK};
use crate::error::{AkamaiError, Result};
use crate::manifest::BinaryTarget;
use crate::terminal::Terminal;
use crate::upgrade::{
    self, CHECK_IGNORE, CHECK_NEVER, CheckSchedule, UpgradeOutcome, Upgrader,
};

/// `akamai upgrade`: install the latest release without asking
pub fn run() -> Result<()> {
    let session = Session::open()?;
    let upgrader = upgrader(&session)?;

    match upgrader.run(true, Vec::new()).map_err(exit_on_rollback_failure)? {
        UpgradeOutcome::Relaunch { .. } => {
            session.terminal.writeln("Akamai CLI upgraded successfully.");
        }
        UpgradeOutcome::UpToDate | UpgradeOutcome::Declined { .. } => {
            session
                .terminal
                .writeln("Akamai CLI is already up-to-date.");
        }
    }
    Ok(())
}

/// Time-gated check run before dispatching any other command.
///
/// Returns the exit code of the relaunched command line when an upgrade
/// was applied. Failures are logged and never block the command.
pub fn check_on_startup(args: &[OsString]) -> Option<i32> {
    if !std::io::stdin().is_terminal() {
        return None;
    }

    match startup_check(args) {
        Ok(code) => code,
        Err(e) => {
            let e = exit_on_rollback_failure(e);
            warn!(error = %e, "upgrade check failed");
            None
        }
    }
}

fn startup_check(args: &[OsString]) -> Result<Option<i32>> {
    let session = Session::open()?;
    let mut config = FileConfig::load(&session.paths.config_file)?;

    if !is_due(&mut config, &session.terminal)? {
        return Ok(None);
    }
    upgrade::record_check(&mut config, Utc::now())?;

    let outcome = upgrader(&session)?.run(false, args.to_vec())?;
    finish_startup_check(outcome)
}

/// Run the upgraded binary with the original command line and forward its exit code
fn finish_startup_check(outcome: UpgradeOutcome) -> Result<Option<i32>> {
    match outcome {
        UpgradeOutcome::Relaunch { executable, args } => {
            let rest: Vec<OsString> = args.into_iter().skip(1).collect();
            passthrough(&executable, &rest, &[]).map(Some)
        }
        UpgradeOutcome::Declined { latest } => {
            debug!(latest, "upgrade declined");
            Ok(None)
        }
        UpgradeOutcome::UpToDate => Ok(None),
    }
}

/// Whether a check should run now, asking for consent the first time
fn is_due(config: &mut dyn ConfigStore, terminal: &dyn Terminal) -> Result<bool> {
    match upgrade::schedule(config, Utc::now()) {
        CheckSchedule::Due => Ok(true),
        CheckSchedule::Disabled | CheckSchedule::NotDue => Ok(false),
        CheckSchedule::Unconfigured => {
            let enabled = terminal.confirm(
                "Akamai CLI can automatically check for upgrades once a day. Enable this?",
                true,
            )?;
            let value = if enabled { CHECK_NEVER } else { CHECK_IGNORE };
            config.set(CLI_SECTION, LAST_UPGRADE_CHECK, value);
            config.save()?;
            Ok(enabled)
        }
    }
}

fn upgrader(session: &Session) -> Result<Upgrader<'_>> {
    Ok(Upgrader::new(
        &session.fetcher,
        &session.terminal,
        upgrade::repository(),
        env!("CARGO_PKG_VERSION"),
        current_executable()?,
        BinaryTarget::host(),
    ))
}

fn current_executable() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| AkamaiError::io("Unable to locate the running executable", e))?;
    dunce::canonicalize(&exe)
        .map_err(|e| AkamaiError::io(format!("Unable to resolve {}", exe.display()), e))
}

/// A failed rollback may have left no usable binary behind; stop right here
fn exit_on_rollback_failure(e: AkamaiError) -> AkamaiError {
    if let AkamaiError::RollbackFailed { .. } = e {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{MemoryConfig, ScriptedTerminal};

    #[test]
    fn test_first_run_asks_and_remembers_opt_out() {
        let mut config = MemoryConfig::new();
        let terminal = ScriptedTerminal::new().answering(&[false]);

        assert!(!is_due(&mut config, &terminal).unwrap());
        assert_eq!(
            config.get(CLI_SECTION, LAST_UPGRADE_CHECK).as_deref(),
            Some(CHECK_IGNORE)
        );

        assert!(!is_due(&mut config, &terminal).unwrap());
        assert_eq!(terminal.prompts().len(), 1);
    }

    #[test]
    fn test_first_run_opt_in_checks_immediately() {
        let mut config = MemoryConfig::new();
        let terminal = ScriptedTerminal::new().answering(&[true]);

        assert!(is_due(&mut config, &terminal).unwrap());
        assert_eq!(
            config.get(CLI_SECTION, LAST_UPGRADE_CHECK).as_deref(),
            Some(CHECK_NEVER)
        );
    }

    #[test]
    fn test_recent_check_is_not_due() {
        let mut config =
            MemoryConfig::new().with(CLI_SECTION, LAST_UPGRADE_CHECK, &Utc::now().to_rfc3339());
        let terminal = ScriptedTerminal::new();

        assert!(!is_due(&mut config, &terminal).unwrap());
        assert!(terminal.prompts().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_relaunch_forwards_exit_code() {
        let outcome = UpgradeOutcome::Relaunch {
            executable: PathBuf::from("/bin/sh"),
            args: ["akamai", "-c", "exit 7"].map(OsString::from).to_vec(),
        };
        assert_eq!(finish_startup_check(outcome).unwrap(), Some(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_relaunch_passes_original_arguments() {
        let outcome = UpgradeOutcome::Relaunch {
            executable: PathBuf::from("/bin/sh"),
            args: ["akamai", "-c", "exit $#", "sh", "purge", "invalidate"]
                .map(OsString::from)
                .to_vec(),
        };
        assert_eq!(finish_startup_check(outcome).unwrap(), Some(2));
    }

    #[test]
    fn test_no_relaunch_without_upgrade() {
        assert_eq!(finish_startup_check(UpgradeOutcome::UpToDate).unwrap(), None);
        let declined = UpgradeOutcome::Declined {
            latest: "1.6.1".to_string(),
        };
        assert_eq!(finish_startup_check(declined).unwrap(), None);
    }
}
