//! Repository references given to `akamai install`

use crate::error::{AkamaiError, Result};

const GITHUB: &str = "https://github.com/";
const OFFICIAL_OWNER: &str = "akamai";
const LEGACY_OWNER: &str = "akamai-open";

/// Canonical clone URL for a user supplied repository reference.
///
/// - `purge`, `cli-purge` → `https://github.com/akamai/cli-purge.git`
/// - `owner/repo` → `https://github.com/owner/repo.git`
/// - `akamai-open/...` → moved to the `akamai` owner
/// - `https://`, `http://`, `ssh://`, `git@` and `file://` URLs pass through;
///   GitHub URLs get a `.git` suffix
pub fn githubize(reference: &str) -> Result<String> {
    let reference = reference.trim().trim_end_matches('/');
    if reference.is_empty() {
        return Err(AkamaiError::InvalidRepository {
            reference: reference.to_string(),
        });
    }

    if reference.starts_with("file://") {
        return Ok(reference.to_string());
    }

    let is_url = ["https://", "http://", "ssh://", "git@"]
        .iter()
        .any(|scheme| reference.starts_with(scheme));
    if is_url {
        return Ok(if reference.starts_with(GITHUB) {
            with_git_suffix(reference)
        } else {
            reference.to_string()
        });
    }

    let path = if reference.contains('/') {
        match reference.split_once('/') {
            Some((LEGACY_OWNER, repo)) => format!("{OFFICIAL_OWNER}/{repo}"),
            _ => reference.to_string(),
        }
    } else {
        let name = reference.strip_prefix("cli-").unwrap_or(reference);
        format!("{OFFICIAL_OWNER}/cli-{name}")
    };

    Ok(with_git_suffix(&format!("{GITHUB}{path}")))
}

fn with_git_suffix(url: &str) -> String {
    if url.ends_with(".git") {
        url.to_string()
    } else {
        format!("{url}.git")
    }
}

/// Directory an installed repository lives in: the URL basename without `.git`
pub fn repository_dir_name(url: &str) -> Result<String> {
    let base = url
        .trim_end_matches('/')
        .rsplit(['/', ':', '\\'])
        .next()
        .unwrap_or_default();
    let name = base.strip_suffix(".git").unwrap_or(base);

    if name.is_empty() || name == "." || name == ".." {
        return Err(AkamaiError::InvalidRepository {
            reference: url.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Whether `url` is an official `akamai/cli-*` GitHub repository
pub fn is_official(url: &str) -> bool {
    let lower = url.to_lowercase();
    ["github.com/akamai/cli-", "github.com:akamai/cli-"]
        .iter()
        .any(|prefix| lower.contains(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_names() {
        assert_eq!(
            githubize("purge").unwrap(),
            "https://github.com/akamai/cli-purge.git"
        );
        assert_eq!(
            githubize("cli-purge").unwrap(),
            "https://github.com/akamai/cli-purge.git"
        );
    }

    #[test]
    fn test_owner_repo() {
        assert_eq!(
            githubize("someone/cli-tool").unwrap(),
            "https://github.com/someone/cli-tool.git"
        );
        assert_eq!(
            githubize("akamai-open/cli-api-gateway").unwrap(),
            "https://github.com/akamai/cli-api-gateway.git"
        );
    }

    #[test]
    fn test_urls_pass_through() {
        assert_eq!(
            githubize("https://github.com/akamai/cli-purge").unwrap(),
            "https://github.com/akamai/cli-purge.git"
        );
        assert_eq!(
            githubize("https://github.com/akamai/cli-purge.git").unwrap(),
            "https://github.com/akamai/cli-purge.git"
        );
        assert_eq!(
            githubize("git@github.com:akamai/cli-purge.git").unwrap(),
            "git@github.com:akamai/cli-purge.git"
        );
        assert_eq!(
            githubize("https://gitlab.example.com/team/tool").unwrap(),
            "https://gitlab.example.com/team/tool"
        );
        assert_eq!(githubize("file:///tmp/cli-echo").unwrap(), "file:///tmp/cli-echo");
    }

    #[test]
    fn test_empty_reference() {
        assert!(matches!(
            githubize("  ").unwrap_err(),
            AkamaiError::InvalidRepository { .. }
        ));
    }

    #[test]
    fn test_repository_dir_name() {
        assert_eq!(
            repository_dir_name("https://github.com/akamai/cli-purge.git").unwrap(),
            "cli-purge"
        );
        assert_eq!(
            repository_dir_name("git@github.com:akamai/cli-purge.git").unwrap(),
            "cli-purge"
        );
        assert_eq!(repository_dir_name("file:///tmp/cli-echo/").unwrap(), "cli-echo");
        assert!(repository_dir_name("https://github.com/.git").is_err());
    }

    #[test]
    fn test_is_official() {
        assert!(is_official("https://github.com/akamai/cli-purge.git"));
        assert!(is_official("git@github.com:akamai/cli-purge.git"));
        assert!(!is_official("https://github.com/someone/cli-tool.git"));
        assert!(!is_official("file:///tmp/cli-echo"));
    }
}
