//! File-backed host over a buildout-style configuration file
//!
//! Values are read with `${section:key}` references substituted and
//! `${buildout:directory}` defaulting to the directory holding the file.
//! Relative develop paths are taken relative to that directory. Writing
//! back keeps every other section exactly as parsed.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use verpin_config::ini::{parse_ini, ConfigTable};
use verpin_config::settings::BUILDOUT_SECTION;
use verpin_core::error::{VerpinError, VerpinResult};
use verpin_core::host::{HostConfig, SectionValues};
use verpin_core::types::VersionTable;

/// Nesting limit for `${section:key}` references
const MAX_SUBSTITUTION_DEPTH: usize = 10;

/// Host reading and writing one configuration file
#[derive(Debug, Clone)]
pub struct FileHost {
    path: Utf8PathBuf,
    directory: Utf8PathBuf,
    config: ConfigTable,
}

impl FileHost {
    /// Parse the configuration file at `path`
    pub fn load(path: &Utf8Path) -> VerpinResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| VerpinError::io(format!("Failed to read {}", path), e))?;
        let config = parse_ini(&content, path.as_str())?;
        let directory = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        debug!("loaded {} ({} sections)", path, config.section_names().len());

        Ok(Self {
            path: path.to_path_buf(),
            directory,
            config,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write the configuration, including any replaced section, back to disk
    pub fn write(&self) -> VerpinResult<()> {
        fs::write(&self.path, self.config.to_ini_string())
            .map_err(|e| VerpinError::io(format!("Failed to write {}", self.path), e))
    }

    fn raw(&self, section: &str, key: &str) -> Option<String> {
        match self.config.get(section, key) {
            Some(value) => Some(value.to_string()),
            None if section == BUILDOUT_SECTION && key == "directory" => {
                Some(self.directory.to_string())
            }
            None => None,
        }
    }

    /// Replace `${section:key}` references in `value`
    ///
    /// Unknown references are kept verbatim.
    fn substitute(&self, value: &str, depth: usize) -> String {
        let mut output = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                output.push_str(&rest[start..]);
                return output;
            };

            let reference = &after[..end];
            let resolved = reference
                .split_once(':')
                .and_then(|(section, key)| self.raw(section, key));

            match resolved {
                Some(found) if depth < MAX_SUBSTITUTION_DEPTH => {
                    output.push_str(&self.substitute(&found, depth + 1));
                }
                _ => {
                    warn!("Unable to substitute ${{{}}}", reference);
                    output.push_str(&rest[start..start + end + 3]);
                }
            }
            rest = &after[end + 1..];
        }

        output.push_str(rest);
        output
    }

    fn absolute_paths(&self, value: &str) -> String {
        value
            .split_whitespace()
            .map(|entry| {
                let path = Utf8Path::new(entry);
                if path.is_absolute() {
                    path.to_string()
                } else {
                    self.directory.join(path).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HostConfig for FileHost {
    fn get_section(&self, name: &str) -> Option<SectionValues> {
        let items = self.config.items(name)?;

        Some(
            items
                .into_iter()
                .map(|(key, value)| {
                    let mut value = self.substitute(&value, 0);
                    if name == BUILDOUT_SECTION && key == "develop" {
                        value = self.absolute_paths(&value);
                    }
                    (key, value)
                })
                .collect(),
        )
    }

    fn set_section(&mut self, name: &str, values: &VersionTable) -> VerpinResult<()> {
        self.config.set_section(name, values)
    }
}
