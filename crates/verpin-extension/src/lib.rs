//! Build orchestrator extension for verpin
//!
//! Hooks into a host build orchestrator before it installs anything:
//! selects a platform, loads and combines the configured version sources,
//! layers the project's own pins and develop directives on top and writes
//! the result back into the host's version section.
//!
//! ```no_run
//! use verpin_extension::{start, MemoryHost, RecordingInstaller};
//!
//! let mut host = MemoryHost::new()
//!     .with_section("versions", &[("alpha", "1.0")])
//!     .with_section(
//!         "platform-versions-config",
//!         &[("sources", "/opt/platform/versions.cfg"), ("default-platform", "current")],
//!     );
//! let mut installer = RecordingInstaller::new();
//! let resolution = start(&mut host, &mut installer)?;
//! println!("{} pins for {}", resolution.versions.len(), resolution.platform);
//! # Ok::<(), verpin_core::VerpinError>(())
//! ```

pub mod develop;
pub mod host;
pub mod run;

// Re-export main types
pub use develop::{
    develop_directives, PackageIdentityResolver, ProcessRunner, ProjectIdentityResolver,
    ScriptOutput, ScriptRunner,
};
pub use host::{MemoryHost, RecordingInstaller};
pub use run::{apply_versions, finish, start, start_with, PlatformVersions, Resolution};

use verpin_core::error::VerpinError;

/// Result type for extension operations
pub type ExtensionResult<T> = Result<T, VerpinError>;
