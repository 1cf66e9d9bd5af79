//! INI-style configuration parsing and serialization
//!
//! Version sources and host build files share one format: `[section]`
//! headers, `key = value` (or `key: value`) lines, indented continuation
//! lines and full-line `#`/`;` comments. A `<<= <parent` line inside a
//! section marks it as extending `parent`; see [`crate::enhance`].

use indexmap::IndexMap;
use tracing::warn;

use verpin_core::error::{VerpinError, VerpinResult};
use verpin_core::host::{HostConfig, SectionValues};
use verpin_core::types::VersionTable;

use crate::ConfigResult;

/// Section whose keys act as fallbacks for every other section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Key under which the inheritance marker is written (`<<= <parent`)
pub const EXTENDS_KEY: &str = "<<";

/// One named section of a configuration table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Key/value pairs in file order
    pub values: IndexMap<String, String>,
    /// Sections this one extends, in declaration order
    pub extends: Vec<String>,
}

/// Parsed configuration: sections in first-seen order plus `[DEFAULT]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTable {
    defaults: IndexMap<String, String>,
    sections: IndexMap<String, Section>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Merge a later definition of the same section into this one
    fn merge_from(&mut self, other: Section) {
        for (key, value) in other.values {
            self.values.insert(key, value);
        }
        if !other.extends.is_empty() {
            self.extends = other.extends;
        }
    }
}

impl ConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text; `origin` names the text in error messages
    pub fn parse(content: &str, origin: &str) -> ConfigResult<Self> {
        parse_ini(content, origin)
    }

    /// Merge `other` on top of this table
    ///
    /// Sections are additive, keys of `other` overwrite same-named keys, and
    /// an inheritance marker in `other` replaces the existing one.
    pub fn merge(&mut self, other: ConfigTable) {
        for (key, value) in other.defaults {
            self.defaults.insert(key, value);
        }
        for (name, section) in other.sections {
            self.sections.entry(name).or_default().merge_from(section);
        }
    }

    /// Section names in first-seen order, `[DEFAULT]` excluded
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    pub fn defaults(&self) -> &IndexMap<String, String> {
        &self.defaults
    }

    /// Items of a section with `[DEFAULT]` keys filled in underneath
    pub fn items(&self, name: &str) -> Option<IndexMap<String, String>> {
        let section = self.sections.get(name)?;
        let mut items = self.defaults.clone();
        for (key, value) in &section.values {
            items.insert(key.clone(), value.clone());
        }
        Some(items)
    }

    /// Items of a section read as a version table
    pub fn versions(&self, name: &str) -> Option<VersionTable> {
        self.items(name).map(|items| items.into_iter().collect())
    }

    /// Value of `key` in `section`, falling back to `[DEFAULT]`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let section = self.sections.get(section)?;
        section
            .get(key)
            .or_else(|| self.defaults.get(key).map(String::as_str))
    }

    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.values_mut(section).insert(key.into(), value.into());
    }

    /// Replace a section wholesale; the section is created if missing
    pub fn replace_section<I, K, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let section = Section {
            values: values.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            extends: Vec::new(),
        };
        self.sections.insert(name.to_string(), section);
    }

    /// Render the table back to INI text
    pub fn to_ini_string(&self) -> String {
        let mut output = String::new();

        if !self.defaults.is_empty() {
            output.push_str(&format!("[{}]\n", DEFAULT_SECTION));
            write_values(&mut output, &self.defaults);
            output.push('\n');
        }

        for (name, section) in &self.sections {
            output.push_str(&format!("[{}]\n", name));
            if !section.extends.is_empty() {
                let parents: Vec<String> = section.extends.iter().map(|p| format!("<{}", p)).collect();
                output.push_str(&format!("{}= {}\n", EXTENDS_KEY, parents.join(" ")));
            }
            write_values(&mut output, &section.values);
            output.push('\n');
        }

        output
    }

    fn values_mut(&mut self, section: &str) -> &mut IndexMap<String, String> {
        if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            &mut self.sections.entry(section.to_string()).or_default().values
        }
    }
}

impl HostConfig for ConfigTable {
    fn get_section(&self, name: &str) -> Option<SectionValues> {
        self.items(name)
    }

    fn set_section(&mut self, name: &str, values: &VersionTable) -> VerpinResult<()> {
        self.replace_section(name, values.iter());
        Ok(())
    }
}

/// Parse INI text into a configuration table
pub fn parse_ini(content: &str, origin: &str) -> ConfigResult<ConfigTable> {
    let mut table = ConfigTable::new();
    let mut current_section: Option<String> = None;
    let mut current_key: Option<String> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        // Indented lines continue the previous value
        if line.starts_with(char::is_whitespace) {
            if let (Some(section), Some(key)) = (&current_section, &current_key) {
                if let Some(value) = table.values_mut(section).get_mut(key) {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
        }

        if trimmed.starts_with('[') {
            let end = trimmed
                .find(']')
                .ok_or_else(|| parse_error(origin, line_no, "unterminated section header"))?;
            let name = trimmed[1..end].trim();
            if name.is_empty() {
                return Err(parse_error(origin, line_no, "empty section name"));
            }
            if name != DEFAULT_SECTION {
                table.sections.entry(name.to_string()).or_default();
            }
            current_section = Some(name.to_string());
            current_key = None;
            continue;
        }

        let section = current_section
            .as_ref()
            .ok_or_else(|| parse_error(origin, line_no, "key defined before any section header"))?;
        let (key, value) = split_option(trimmed)
            .ok_or_else(|| parse_error(origin, line_no, "expected 'key = value'"))?;

        table.values_mut(section).insert(key.clone(), value);
        current_key = Some(key);
    }

    if table.defaults.shift_remove(EXTENDS_KEY).is_some() {
        warn!("{}: ignoring inheritance marker in [{}]", origin, DEFAULT_SECTION);
    }
    for section in table.sections.values_mut() {
        if let Some(marker) = section.values.shift_remove(EXTENDS_KEY) {
            section.extends = parse_extends(&marker);
        }
    }

    Ok(table)
}

/// Split `key = value` / `key: value` at the first delimiter
fn split_option(line: &str) -> Option<(String, String)> {
    let delimiter = line.find(|c: char| c == '=' || c == ':')?;
    let key = line[..delimiter].trim();
    if key.is_empty() {
        return None;
    }
    let value = strip_inline_comment(line[delimiter + 1..].trim());
    Some((key.to_string(), value.to_string()))
}

/// Drop a trailing `;` comment when it is preceded by whitespace
fn strip_inline_comment(value: &str) -> &str {
    let mut previous_is_space = false;
    for (index, c) in value.char_indices() {
        if c == ';' && previous_is_space {
            return value[..index].trim_end();
        }
        previous_is_space = c.is_whitespace();
    }
    value
}

/// Parent names from a marker value such as `<current <base`
fn parse_extends(marker: &str) -> Vec<String> {
    marker
        .split_whitespace()
        .map(|token| token.trim_start_matches('<'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn write_values(output: &mut String, values: &IndexMap<String, String>) {
    for (key, value) in values {
        let mut lines = value.split('\n');
        let first = lines.next().unwrap_or_default();
        if first.is_empty() {
            output.push_str(&format!("{} =\n", key));
        } else {
            output.push_str(&format!("{} = {}\n", key, first));
        }
        for line in lines {
            output.push_str(&format!("    {}\n", line));
        }
    }
}

fn parse_error(origin: &str, line: usize, message: &str) -> VerpinError {
    VerpinError::IniParse {
        origin: origin.to_string(),
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests;
