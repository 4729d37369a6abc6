//! Git operations backing package install and update
//!
//! Packages are plain git working trees. Install clones with a shallow
//! history, update pulls the current branch and compares `HEAD` before and
//! after to decide whether dependencies must be reinstalled.
//!
//! Authentication is delegated to git's own mechanisms (SSH agent, keys in
//! `~/.ssh/`, credential helpers).

mod auth;
mod clone;
mod pull;
mod url;

use std::path::Path;

use git2::{ErrorClass, Repository};

use crate::error::{AkamaiError, Result};

pub use clone::{CLONE_DEPTH, clone};
pub use pull::pull;

/// Open the working tree at `path`
pub fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| AkamaiError::GitOpenFailed {
        path: path.display().to_string(),
        reason: e.message().to_string(),
    })
}

/// Commit id `HEAD` points at
pub fn head(repo: &Repository) -> Result<String> {
    let commit = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .map_err(|e| AkamaiError::GitOpenFailed {
            path: repo.workdir().unwrap_or(repo.path()).display().to_string(),
            reason: e.message().to_string(),
        })?;
    Ok(commit.id().to_string())
}

/// Short user-facing explanation of a libgit2 failure
pub(crate) fn describe_error(err: &git2::Error) -> String {
    let message = err.message().to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if has(&["not found", "404", "too many redirects", "authentication replays"]) {
        "Repository not found".to_string()
    } else if has(&["authentication", "credentials"]) {
        "Authentication failed".to_string()
    } else if has(&["permission denied", "access denied"]) {
        "Permission denied".to_string()
    } else if has(&["connection", "network", "timed out", "timeout"]) {
        "Network error".to_string()
    } else {
        match err.class() {
            ErrorClass::Http => format!("HTTP error: {}", err.message()),
            ErrorClass::Ssh => format!("SSH error: {}", err.message()),
            _ => err.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_temp_dir, create_upstream_repo};

    #[test]
    fn test_open_and_head() {
        let (_temp, path) = create_upstream_repo("cli-x", &[("cli.json", "{}")]);
        let repo = open(&path).unwrap();
        let id = head(&repo).unwrap();
        assert_eq!(id.len(), 40);
    }

    #[test]
    fn test_open_not_a_repository() {
        let temp = create_temp_dir();
        let Err(err) = open(temp.path()) else {
            panic!("opened a directory that is not a repository");
        };
        assert!(matches!(err, AkamaiError::GitOpenFailed { .. }));
    }

    #[test]
    fn test_head_of_empty_repository() {
        let temp = create_temp_dir();
        let repo = Repository::init(temp.path()).unwrap();
        assert!(head(&repo).is_err());
    }

    #[test]
    fn test_describe_error() {
        assert_eq!(
            describe_error(&git2::Error::from_str("remote returned 404")),
            "Repository not found"
        );
        assert_eq!(
            describe_error(&git2::Error::from_str("too many authentication attempts")),
            "Authentication failed"
        );
        assert_eq!(
            describe_error(&git2::Error::from_str("something odd")),
            "something odd"
        );
    }
}
