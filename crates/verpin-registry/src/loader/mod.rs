//! URI dispatch for version sources
//!
//! - `egg://package/path` reads a packaged resource
//! - anything else containing `://` is a URL (`file://` or HTTP(S))
//! - everything else is a local filesystem path

use camino::Utf8PathBuf;
use tracing::debug;
use url::Url;

use verpin_core::error::{VerpinError, VerpinResult};
use verpin_core::loader::{PackageResources, ResourceLoader};

use crate::client::SourceClient;
use crate::resources::DirectoryResources;
use crate::RegistryResult;

const PACKAGE_SCHEME: &str = "egg://";

/// How a source URI is fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Resource `path` inside installed package `package`
    Package { package: String, path: String },
    /// Network (or `file://`) URL
    Url(String),
    /// Local file
    File(Utf8PathBuf),
}

impl SourceKind {
    /// Classify a source URI
    pub fn classify(uri: &str) -> Self {
        if let Some(rest) = uri.strip_prefix(PACKAGE_SCHEME) {
            if let Some((package, path)) = rest.split_once('/') {
                if !package.is_empty() {
                    return SourceKind::Package {
                        package: package.to_string(),
                        path: path.to_string(),
                    };
                }
            }
        }

        if uri.contains("://") {
            SourceKind::Url(uri.to_string())
        } else {
            SourceKind::File(Utf8PathBuf::from(uri))
        }
    }
}

/// Default [`ResourceLoader`] dispatching on the shape of the URI
pub struct UriLoader {
    client: SourceClient,
    resources: Box<dyn PackageResources>,
}

impl UriLoader {
    /// Create a loader resolving packaged resources under `resource_roots`
    pub fn new(resource_roots: Vec<Utf8PathBuf>) -> RegistryResult<Self> {
        Ok(Self::with_resources(
            SourceClient::new()?,
            Box::new(DirectoryResources::new(resource_roots)),
        ))
    }

    /// Create a loader with a custom packaged resource provider
    pub fn with_resources(client: SourceClient, resources: Box<dyn PackageResources>) -> Self {
        Self { client, resources }
    }

    fn fetch_url(&self, uri: &str) -> VerpinResult<Vec<u8>> {
        let url = Url::parse(uri)
            .map_err(|e| VerpinError::source_fetch(uri, format!("invalid URL: {}", e), e))?;

        match url.scheme() {
            "http" | "https" => self.client.fetch(&url),
            "file" => {
                let path = url.to_file_path().map_err(|_| VerpinError::SourceFetch {
                    uri: uri.to_string(),
                    reason: "URL does not name a local file".to_string(),
                    source: None,
                })?;
                std::fs::read(&path)
                    .map_err(|e| VerpinError::source_fetch(uri, format!("failed to read {}", path.display()), e))
            }
            scheme => Err(VerpinError::SourceFetch {
                uri: uri.to_string(),
                reason: format!("unsupported URL scheme '{}'", scheme),
                source: None,
            }),
        }
    }
}

impl ResourceLoader for UriLoader {
    fn fetch(&self, uri: &str) -> VerpinResult<Vec<u8>> {
        let kind = SourceKind::classify(uri);
        debug!("fetching {:?}", kind);

        match kind {
            SourceKind::Package { package, path } => self.resources.get_data(&package, &path),
            SourceKind::Url(url) => self.fetch_url(&url),
            SourceKind::File(path) => std::fs::read(&path)
                .map_err(|e| VerpinError::source_fetch(uri, format!("failed to read {}", path), e)),
        }
    }
}
