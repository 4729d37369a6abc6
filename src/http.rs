//! HTTP access for release checks and binary downloads

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::redirect::Policy;
use tracing::debug;

use crate::error::{AkamaiError, Result};

/// Network operations used by the core
pub trait Fetcher {
    /// `Location` header of a redirect answering a HEAD request to `url`.
    ///
    /// `None` when the server does not redirect.
    fn redirect_location(&self, url: &str) -> Result<Option<String>>;

    /// Body of a successful GET request to `url`
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetcher backed by a blocking `reqwest` client
pub struct HttpFetcher {
    client: Client,
    no_redirect: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let user_agent = concat!("akamai-cli/", env!("CARGO_PKG_VERSION"));
        let client = Client::builder().user_agent(user_agent).build()?;
        let no_redirect = Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            no_redirect,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn redirect_location(&self, url: &str) -> Result<Option<String>> {
        debug!(url, "HEAD");
        let response = self.no_redirect.head(url).send()?;
        Ok(redirect_target(response.status(), response.headers()))
    }

    fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET");
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(AkamaiError::HttpFailed {
                url: url.to_string(),
                reason: format!("unexpected status {}", response.status()),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// `Location` of any 3xx answer carrying one
fn redirect_target(status: StatusCode, headers: &HeaderMap) -> Option<String> {
    if !status.is_redirection() {
        return None;
    }
    headers
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
