//! Resource loaders for verpin
//!
//! This crate fetches version sources named by URI: packaged resources
//! (`egg://package/path`), network URLs through a blocking HTTP client, and
//! plain filesystem paths. Every fetch is attempted once; failures are
//! returned to the caller untouched.

pub mod client;
pub mod loader;
pub mod resources;

// Re-export main types
pub use client::SourceClient;
pub use loader::{SourceKind, UriLoader};
pub use resources::DirectoryResources;

use verpin_core::error::VerpinError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, VerpinError>;
