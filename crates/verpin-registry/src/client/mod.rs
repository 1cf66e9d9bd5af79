//! Blocking HTTP client for network version sources

use reqwest::blocking::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use verpin_core::error::VerpinError;
use crate::RegistryResult;

/// HTTP client used to download version sources
///
/// Requests block the calling thread and have no timeout: a source that
/// never answers stalls the run.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    /// Create a new client
    pub fn new() -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            .timeout(None)
            .gzip(true)
            .user_agent(concat!("verpin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VerpinError::SourceFetch {
                uri: String::new(),
                reason: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client })
    }

    /// Download the body behind `url`
    ///
    /// Credentials embedded in the URL are sent as basic auth and stripped
    /// from the request line. Any non-success status is an error.
    pub fn fetch(&self, url: &Url) -> RegistryResult<Vec<u8>> {
        let (target, credentials) = split_credentials(url)?;
        debug!("GET {}", target);

        let mut request = self.client.get(target.clone());
        if let Some((username, password)) = credentials {
            request = request.basic_auth(username, password);
        }

        let response = request
            .send()
            .map_err(|e| VerpinError::source_fetch(url.as_str(), format!("request failed: {}", e), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerpinError::SourceFetch {
                uri: url.to_string(),
                reason: format!("server returned status {}", status),
                source: None,
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| VerpinError::source_fetch(url.as_str(), format!("failed to read body: {}", e), e))?;

        Ok(bytes.to_vec())
    }
}

/// Separate `user:password@` from a URL
fn split_credentials(url: &Url) -> RegistryResult<(Url, Option<(String, Option<String>)>)> {
    if url.username().is_empty() && url.password().is_none() {
        return Ok((url.clone(), None));
    }

    let credentials = (
        url.username().to_string(),
        url.password().map(str::to_string),
    );
    let mut target = url.clone();
    target
        .set_username("")
        .and_then(|()| target.set_password(None))
        .map_err(|()| VerpinError::SourceFetch {
            uri: url.to_string(),
            reason: "credentials cannot be removed from this URL".to_string(),
            source: None,
        })?;

    Ok((target, Some(credentials)))
}
