//! URL rewriting before handing repository URLs to libgit2

use std::borrow::Cow;

/// Rewrite SCP-style `git@host:owner/repo.git` as `ssh://git@host/owner/repo.git`
pub fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }

    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.trim_start_matches('/');
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Make `file://` URLs absolute with forward slashes on Unix
pub fn normalize_file_url(url: &str) -> Cow<'_, str> {
    let Some(rest) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };

    #[cfg(not(windows))]
    {
        if rest.contains('\\') {
            return Cow::Owned(format!("file:///{}", rest.replace('\\', "/").trim_start_matches('/')));
        }
        if !rest.is_empty() && !rest.starts_with('/') {
            return Cow::Owned(format!("file:///{rest}"));
        }
    }
    #[cfg(windows)]
    let _ = rest;

    Cow::Borrowed(url)
}

/// Whether `url` points at the local file system
pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || std::path::Path::new(url).is_absolute()
}
