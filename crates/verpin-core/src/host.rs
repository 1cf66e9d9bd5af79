//! Narrow interface onto the host build orchestrator.
//!
//! The host owns the sections of its build configuration and its package
//! installer. verpin reads a handful of keys from it and writes one section
//! back; nothing else about the host is assumed.

use indexmap::IndexMap;

use crate::error::VerpinResult;
use crate::types::VersionTable;

/// Key/value pairs of one host configuration section, in file order
pub type SectionValues = IndexMap<String, String>;

/// Section storage of the host build configuration
pub trait HostConfig {
    /// Return a copy of section `name`, or `None` when it does not exist
    fn get_section(&self, name: &str) -> Option<SectionValues>;

    /// Replace every key of section `name` with `values`
    fn set_section(&mut self, name: &str, values: &VersionTable) -> VerpinResult<()>;

    fn get_key(&self, section: &str, key: &str) -> Option<String> {
        self.get_section(section)?.get(key).cloned()
    }

    fn has_section(&self, name: &str) -> bool {
        self.get_section(name).is_some()
    }
}

/// Package installer of the host
pub trait Installer {
    /// Use `versions` as the default pins for anything installed afterwards
    fn set_default_versions(&mut self, versions: &VersionTable);
}

