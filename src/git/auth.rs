//! Credentials for remote operations
//!
//! Nothing is stored by the CLI. Credentials come from the SSH agent,
//! keys under `~/.ssh/`, or git's configured credential helpers.

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

const SSH_KEY_NAMES: &[&str] = &["id_ed25519", "id_ecdsa", "id_rsa"];

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_from_disk(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private, _)| private.exists())
        .find_map(|(private, public)| {
            let public = public.exists().then_some(public.as_path());
            Cred::ssh_key(username, public, &private, None).ok()
        })
        .ok_or_else(|| auth_error("no usable SSH key found"))
}

fn helper_credentials(url: &str, username: Option<&str>) -> Result<Cred, Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;
    Cred::credential_helper(&config, url, username)
        .or_else(|_| Cred::userpass_plaintext(username.unwrap_or("git"), ""))
}

/// Install the credential callback on `callbacks`
pub fn configure(callbacks: &mut RemoteCallbacks<'_>) {
    callbacks.credentials(|url, username, allowed| {
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            let user = username.unwrap_or("git");
            return Cred::ssh_key_from_agent(user).or_else(|_| ssh_key_from_disk(user));
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return helper_credentials(url, username);
        }

        Err(auth_error("authentication failed"))
    });
}
