//! Collaborator traits for fetching source content.
//!
//! The configuration crate only ever sees these traits; `verpin-registry`
//! provides the implementations used in production, tests provide stubs.

use crate::error::VerpinResult;

/// Fetches the raw bytes behind a source URI
///
/// Implementations must fail on any problem. An unreachable source is never
/// treated as empty content.
pub trait ResourceLoader {
    fn fetch(&self, uri: &str) -> VerpinResult<Vec<u8>>;
}

/// Reads a resource shipped inside an installed package
pub trait PackageResources {
    /// Read `path` (relative, `/` separated) from package `package`
    fn get_data(&self, package: &str, path: &str) -> VerpinResult<Vec<u8>>;
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for &T {
    fn fetch(&self, uri: &str) -> VerpinResult<Vec<u8>> {
        (**self).fetch(uri)
    }
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for Box<T> {
    fn fetch(&self, uri: &str) -> VerpinResult<Vec<u8>> {
        (**self).fetch(uri)
    }
}

impl<T: PackageResources + ?Sized> PackageResources for Box<T> {
    fn get_data(&self, package: &str, path: &str) -> VerpinResult<Vec<u8>> {
        (**self).get_data(package, path)
    }
}
