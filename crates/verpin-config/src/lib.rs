//! Configuration handling for verpin
//!
//! This crate parses INI-style version sources, merges them in order,
//! expands section inheritance, selects the platform section and layers
//! platform pins, explicit pins and develop directives into one table.

pub mod enhance;
pub mod ini;
pub mod merge;
pub mod platform;
pub mod settings;
pub mod sources;

// Re-export main types
pub use enhance::expand_inheritance;
pub use ini::{parse_ini, ConfigTable, Section};
pub use merge::{PlatformPins, VersionLayering};
pub use platform::PlatformSelector;
pub use settings::ExtensionSettings;
pub use sources::SourceAggregator;

use verpin_core::error::VerpinError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, VerpinError>;
