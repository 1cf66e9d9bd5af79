//! Core data types for version pinning.
//!
//! These types are shared by configuration loading, the override merger
//! and the host extension.

pub mod develop;
pub mod versions;

pub use develop::{DevelopDirective, PackageIdentity};
pub use versions::VersionTable;
