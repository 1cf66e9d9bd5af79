//! Platform selection
//!
//! The platform names the source section pins are read from. It comes from
//! the environment variable named by `platform-env` when that variable is
//! set, otherwise from the required `default-platform` setting.

use tracing::{debug, error, info};

use verpin_core::error::VerpinError;

use crate::settings::ExtensionSettings;
use crate::ConfigResult;

/// Resolves the platform name for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSelector {
    env_var: Option<String>,
    default_platform: Option<String>,
    config_section: String,
}

impl PlatformSelector {
    pub fn new(
        env_var: Option<String>,
        default_platform: Option<String>,
        config_section: impl Into<String>,
    ) -> Self {
        Self {
            env_var,
            default_platform,
            config_section: config_section.into(),
        }
    }

    pub fn from_settings(settings: &ExtensionSettings) -> Self {
        Self::new(
            settings.platform_env.clone(),
            settings.default_platform.clone(),
            settings.config_section.clone(),
        )
    }

    /// Resolve against the process environment
    pub fn resolve(&self) -> ConfigResult<String> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` to read environment variables
    pub fn resolve_with<F>(&self, lookup: F) -> ConfigResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(platform) = self.platform_from_env(lookup) {
            return Ok(platform);
        }

        match self.default_platform.as_deref().map(str::trim) {
            Some(platform) if !platform.is_empty() => {
                info!(
                    "platform picked by ${{{}:default-platform}} = {}",
                    self.config_section, platform
                );
                Ok(platform.to_string())
            }
            _ => {
                error!(
                    "the configuration ${{{}:default-platform}} is required",
                    self.config_section
                );
                Err(VerpinError::MissingDefaultPlatform {
                    section: self.config_section.clone(),
                })
            }
        }
    }

    fn platform_from_env<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_var = self.env_var.as_deref().map(str::trim).filter(|v| !v.is_empty())?;

        match lookup(env_var).map(|value| value.trim().to_string()) {
            Some(platform) if !platform.is_empty() => {
                debug!("platform picked by environment variable: {} = {}", env_var, platform);
                Some(platform)
            }
            _ => {
                debug!("environment variable '{}' is not set", env_var);
                None
            }
        }
    }
}
