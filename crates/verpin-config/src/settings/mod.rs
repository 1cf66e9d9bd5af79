//! Extension settings read from the host build configuration
//!
//! ```ini
//! [buildout]
//! versions = versions
//! develop = src/gamma
//! platform-versions-config = platform-versions-config
//!
//! [platform-versions-config]
//! sources =
//!     egg://platform.pins/versions.cfg
//!     https://pins.example.com/versions.cfg
//! default-platform = current
//! platform-env = PLATFORM_VERSION
//! develop-packages = gamma
//! ```

use camino::Utf8PathBuf;
use tracing::warn;

use verpin_core::error::VerpinError;
use verpin_core::host::HostConfig;
use verpin_core::types::DevelopDirective;

use crate::ConfigResult;

/// Host section holding the orchestrator's own settings
pub const BUILDOUT_SECTION: &str = "buildout";
/// Default name of the extension's config section
pub const DEFAULT_CONFIG_SECTION: &str = "platform-versions-config";
/// Default name of the host's version section
pub const DEFAULT_TARGET_SECTION: &str = "versions";
pub const DEFAULT_BUILD_SCRIPT: &str = "setup.py";
pub const DEFAULT_BUILD_INTERPRETER: &str = "python3";

/// Everything a run needs from the host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSettings {
    /// Name of the extension's config section
    pub config_section: String,
    /// Whether that section exists in the host
    pub config_present: bool,
    /// Environment variable consulted before `default_platform`
    pub platform_env: Option<String>,
    pub default_platform: Option<String>,
    /// Source URIs in load order
    pub sources: Vec<String>,
    /// Host develop paths, resolved to package identities later
    pub develop_paths: Vec<Utf8PathBuf>,
    /// Directives from `develop-packages`
    pub develop_packages: Vec<DevelopDirective>,
    /// Host section the final pins are written to
    pub target_section: String,
    pub build_script: String,
    pub build_interpreter: String,
    /// Roots searched for `egg://` resources
    pub resource_paths: Vec<Utf8PathBuf>,
}

impl ExtensionSettings {
    /// Read the settings from the host
    pub fn from_host<H: HostConfig + ?Sized>(host: &H) -> ConfigResult<Self> {
        let config_section = non_empty(host.get_key(BUILDOUT_SECTION, "platform-versions-config"))
            .unwrap_or_else(|| DEFAULT_CONFIG_SECTION.to_string());
        let config = host.get_section(&config_section);
        let config_present = config.is_some();
        let config_value = |key: &str| config.as_ref().and_then(|section| section.get(key).cloned());

        let sources = lines(config_value("sources").as_deref());

        let develop_packages = match config_value("develop-packages") {
            Some(text) => parse_develop_packages(&text)?,
            None => Vec::new(),
        };

        let develop_paths = host
            .get_key(BUILDOUT_SECTION, "develop")
            .map(|text| text.split_whitespace().map(Utf8PathBuf::from).collect())
            .unwrap_or_default();

        let target_section = non_empty(host.get_key(BUILDOUT_SECTION, "versions"))
            .unwrap_or_else(|| DEFAULT_TARGET_SECTION.to_string());

        Ok(Self {
            platform_env: non_empty(config_value("platform-env")),
            default_platform: non_empty(config_value("default-platform")),
            sources,
            develop_paths,
            develop_packages,
            target_section,
            build_script: non_empty(config_value("build-script"))
                .unwrap_or_else(|| DEFAULT_BUILD_SCRIPT.to_string()),
            build_interpreter: non_empty(config_value("build-interpreter"))
                .unwrap_or_else(|| DEFAULT_BUILD_INTERPRETER.to_string()),
            resource_paths: lines(config_value("resource-paths").as_deref())
                .into_iter()
                .map(Utf8PathBuf::from)
                .collect(),
            config_section,
            config_present,
        })
    }
}

/// Parse whitespace separated `develop-packages` entries
///
/// A bare name unpins the package; `name=version` forces the pin.
pub fn parse_develop_packages(text: &str) -> ConfigResult<Vec<DevelopDirective>> {
    let mut directives = Vec::new();

    for entry in text.split_whitespace() {
        match entry.split_once('=') {
            None => directives.push(DevelopDirective::unpin(entry)),
            Some((name, version)) => {
                let (name, version) = (name.trim(), version.trim());
                if name.is_empty() || version.is_empty() {
                    return Err(VerpinError::ConfigValidation {
                        field: "develop-packages".to_string(),
                        reason: format!("'{}' must be a package name or 'name=version'", entry),
                    });
                }
                warn!("develop-packages forces '{}' to '{}'", name, version);
                directives.push(DevelopDirective::pin(name, version));
            }
        }
    }

    Ok(directives)
}

/// Trim a value, treating blank as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Non-blank lines of a multi-line value
fn lines(value: Option<&str>) -> Vec<String> {
    value
        .map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
