//! In-memory host for embedding and tests

use indexmap::IndexMap;

use verpin_core::error::VerpinResult;
use verpin_core::host::{HostConfig, Installer, SectionValues};
use verpin_core::types::VersionTable;

/// Host keeping its sections in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    sections: IndexMap<String, SectionValues>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a section
    pub fn with_section(mut self, name: &str, values: &[(&str, &str)]) -> Self {
        self.sections.insert(
            name.to_string(),
            values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        );
        self
    }
}

impl HostConfig for MemoryHost {
    fn get_section(&self, name: &str) -> Option<SectionValues> {
        self.sections.get(name).cloned()
    }

    fn set_section(&mut self, name: &str, values: &VersionTable) -> VerpinResult<()> {
        let section = self.sections.entry(name.to_string()).or_default();
        section.clear();
        section.extend(values.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Ok(())
    }
}

/// Installer remembering the defaults it was handed
#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    defaults: Option<VersionTable>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults set by the last run, if any
    pub fn default_versions(&self) -> Option<&VersionTable> {
        self.defaults.as_ref()
    }
}

impl Installer for RecordingInstaller {
    fn set_default_versions(&mut self, versions: &VersionTable) {
        self.defaults = Some(versions.clone());
    }
}
