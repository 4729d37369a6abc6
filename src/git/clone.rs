//! Cloning package repositories

use std::path::Path;

use git2::{FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};
use tracing::debug;

use super::describe_error;
use super::url::{is_local, normalize_file_url, normalize_ssh_url};
use crate::error::{AkamaiError, Result};

/// History depth used for package clones
pub const CLONE_DEPTH: i32 = 1;

/// Clone `url` into `target`, fetching at most `depth` commits.
///
/// Local repositories are always cloned in full since libgit2 cannot
/// shallow-fetch over the local transport.
pub fn clone(url: &str, target: &Path, depth: i32) -> Result<Repository> {
    #[cfg(windows)]
    if url.starts_with("file://") {
        return clone_by_copy(url, target);
    }

    let mut callbacks = RemoteCallbacks::new();
    super::auth::configure(&mut callbacks);

    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks);
    if depth > 0 && !is_local(url) {
        fetch.depth(depth);
    }

    let source = normalize_ssh_url(url);
    let source = normalize_file_url(&source);
    debug!(url = %source, target = %target.display(), depth, "cloning");

    RepoBuilder::new()
        .fetch_options(fetch)
        .clone(&source, target)
        .map_err(|e| AkamaiError::GitCloneFailed {
            url: url.to_string(),
            reason: describe_error(&e),
        })
}

/// libgit2 cannot parse drive-letter `file://` URLs; copy the source tree instead
#[cfg(windows)]
fn clone_by_copy(url: &str, target: &Path) -> Result<Repository> {
    let source = url
        .trim_start_matches("file:///")
        .trim_start_matches("file://")
        .replace('|', ":");
    let failed = |reason: String| AkamaiError::GitCloneFailed {
        url: url.to_string(),
        reason,
    };

    let source = Path::new(&source);
    if !source.is_dir() {
        return Err(failed("local path is not a directory".to_string()));
    }
    copy_tree(source, target).map_err(|e| failed(e.to_string()))?;
    Repository::open(target).map_err(|e| failed(e.message().to_string()))
}

#[cfg(windows)]
fn copy_tree(source: &Path, target: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(target)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let destination = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &destination)?;
        } else {
            std::fs::copy(entry.path(), destination)?;
        }
    }
    Ok(())
}
