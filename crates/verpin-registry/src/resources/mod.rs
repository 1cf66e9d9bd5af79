//! Packaged resource lookup for `egg://package/path` sources

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tracing::debug;

use verpin_core::error::{VerpinError, VerpinResult};
use verpin_core::loader::PackageResources;

/// Finds package resources under a list of root directories
///
/// Package `platform.pins` is looked up as `<root>/platform.pins`,
/// `<root>/platform/pins` and, for dashed names, `<root>/platform_pins`.
#[derive(Debug, Clone, Default)]
pub struct DirectoryResources {
    roots: Vec<Utf8PathBuf>,
}

impl DirectoryResources {
    pub fn new(roots: Vec<Utf8PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.roots
    }

    /// Candidate directories for a package, in lookup order
    fn package_dirs(&self, package: &str) -> Vec<Utf8PathBuf> {
        let mut names = vec![package.to_string()];
        for alternative in [package.replace('.', "/"), package.replace('-', "_")] {
            if !names.contains(&alternative) {
                names.push(alternative);
            }
        }

        self.roots
            .iter()
            .flat_map(|root| names.iter().map(move |name| root.join(name)))
            .collect()
    }
}

impl PackageResources for DirectoryResources {
    fn get_data(&self, package: &str, path: &str) -> VerpinResult<Vec<u8>> {
        let uri = format!("egg://{}/{}", package, path);
        let not_found = |reason: String| VerpinError::SourceFetch {
            uri: uri.clone(),
            reason,
            source: None,
        };

        if path.is_empty() {
            return Err(not_found("resource path is empty".to_string()));
        }

        for dir in self.package_dirs(package) {
            if !dir.is_dir() {
                continue;
            }
            let candidate = resource_file(&dir, path)
                .ok_or_else(|| not_found(format!("resource path '{}' escapes the package", path)))?;

            if candidate.is_file() {
                debug!("resolved {} to {}", uri, candidate);
                return std::fs::read(&candidate)
                    .map_err(|e| VerpinError::source_fetch(uri.as_str(), format!("failed to read {}", candidate), e));
            }
        }

        Err(not_found(format!(
            "package '{}' has no resource '{}' (searched {} root(s))",
            package,
            path,
            self.roots.len()
        )))
    }
}

/// Join a `/` separated resource path onto `dir`
///
/// `None` when the path is absolute or climbs out of `dir`.
fn resource_file(dir: &Utf8Path, path: &str) -> Option<Utf8PathBuf> {
    let mut file = dir.to_path_buf();
    for component in Utf8Path::new(path).components() {
        match component {
            Utf8Component::Normal(part) => file.push(part),
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                return None
            }
        }
    }
    Some(file)
}
