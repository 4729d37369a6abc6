//! Fast-forwarding an installed package to its upstream branch

use git2::{AnnotatedCommit, FetchOptions, RemoteCallbacks, Repository, build::CheckoutBuilder};
use tracing::{debug, info};

use super::describe_error;
use crate::error::{AkamaiError, Result};

/// Result of a pull that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Nothing new upstream
    UpToDate,
    /// The working tree moved to a newer commit
    Updated,
}

/// Pull failures that only mean there was nothing to do
fn is_noop(err: &git2::Error) -> bool {
    let message = err.message().to_lowercase();
    message.contains("already up-to-date") || message.contains("object not found")
}

/// Fetch `origin` for the current branch and fast-forward the working tree
pub fn pull(repo: &Repository) -> Result<PullOutcome> {
    match fetch_and_merge(repo) {
        Ok(outcome) => Ok(outcome),
        Err(e) if is_noop(&e) => {
            debug!(error = %e.message(), "pull reported nothing to do");
            Ok(PullOutcome::UpToDate)
        }
        Err(e) => Err(AkamaiError::FetchFailed {
            reason: describe_error(&e),
        }),
    }
}

fn fetch_and_merge(repo: &Repository) -> std::result::Result<PullOutcome, git2::Error> {
    let head = repo.head()?;
    let branch = head
        .shorthand()
        .filter(|_| head.is_branch())
        .ok_or_else(|| git2::Error::from_str("HEAD is not on a branch"))?
        .to_string();

    let mut callbacks = RemoteCallbacks::new();
    super::auth::configure(&mut callbacks);
    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);

    let mut remote = repo.find_remote("origin")?;
    debug!(branch, "fetching origin");
    remote.fetch(&[branch.as_str()], Some(&mut options), None)?;

    let fetch_head = repo.find_reference("FETCH_HEAD")?;
    let fetched = repo.reference_to_annotated_commit(&fetch_head)?;
    merge(repo, &branch, &fetched)
}

fn merge(
    repo: &Repository,
    branch: &str,
    fetched: &AnnotatedCommit<'_>,
) -> std::result::Result<PullOutcome, git2::Error> {
    let (analysis, _) = repo.merge_analysis(&[fetched])?;

    if analysis.is_up_to_date() {
        return Ok(PullOutcome::UpToDate);
    }
    if !analysis.is_fast_forward() {
        return Err(git2::Error::from_str(
            "local changes diverge from upstream, non-fast-forward update",
        ));
    }

    let refname = format!("refs/heads/{branch}");
    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(fetched.id(), "akamai: fast-forward")?;
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    info!(branch, commit = %fetched.id(), "fast-forwarded");
    Ok(PullOutcome::Updated)
}
