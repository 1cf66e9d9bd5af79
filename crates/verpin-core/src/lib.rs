//! # verpin-core
//!
//! Core types and utilities shared across all verpin crates.
//!
//! This crate provides:
//! - `VersionTable`, `DevelopDirective` and `PackageIdentity` types
//! - `VerpinError` enum for unified error handling
//! - Collaborator traits for fetching source content and reaching the host
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (VersionTable, DevelopDirective, etc.)
//! - `error`: Error types and result aliases
//! - `loader`: Resource fetching traits implemented by `verpin-registry`
//! - `host`: Host configuration and installer traits

pub mod error;
pub mod host;
pub mod loader;
pub mod types;

// Re-export commonly used types
pub use error::{VerpinError, VerpinResult};
pub use host::{HostConfig, Installer, SectionValues};
pub use loader::{PackageResources, ResourceLoader};
pub use types::{DevelopDirective, PackageIdentity, VersionTable};
