//! The platform versions run
//!
//! One run is the whole resolve, merge and apply sequence executed from the
//! host's `start` hook:
//!
//! 1. read [`ExtensionSettings`] from the host
//! 2. select the platform (environment first, then `default-platform`)
//! 3. take the explicit pins of the host's version section
//! 4. load and combine the sources, expanding section inheritance
//! 5. layer platform pins, explicit pins and develop directives
//! 6. write the result back and hand it to the installer

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{debug, info};

use verpin_config::ini::ConfigTable;
use verpin_config::merge::VersionLayering;
use verpin_config::platform::PlatformSelector;
use verpin_config::settings::ExtensionSettings;
use verpin_config::sources::SourceAggregator;
use verpin_core::error::VerpinError;
use verpin_core::host::{HostConfig, Installer};
use verpin_core::loader::ResourceLoader;
use verpin_core::types::{DevelopDirective, VersionTable};
use verpin_registry::UriLoader;

use crate::develop::{develop_directives, PackageIdentityResolver, ProjectIdentityResolver};
use crate::ExtensionResult;

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub platform: String,
    /// `false` when no source defines the platform section
    pub platform_found: bool,
    /// Sections defined across all sources
    pub available_platforms: Vec<String>,
    pub sources: Vec<String>,
    /// Host section the pins were written to
    pub target_section: String,
    /// Develop directives applied, in order
    pub develop: Vec<DevelopDirective>,
    /// Develop paths without a discoverable package
    pub unresolved_develop_paths: Vec<Utf8PathBuf>,
    pub versions: VersionTable,
}

/// Orchestrates a run against a host
pub struct PlatformVersions<L> {
    loader: L,
    identities: Box<dyn PackageIdentityResolver>,
    env: EnvLookup,
}

impl<L: ResourceLoader> PlatformVersions<L> {
    /// Run with `loader`, build-script identities and the process environment
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            identities: Box::new(ProjectIdentityResolver::default()),
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    pub fn with_identities(mut self, identities: Box<dyn PackageIdentityResolver>) -> Self {
        self.identities = identities;
        self
    }

    /// Read environment variables through `lookup` instead of the process
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    /// Resolve, merge and apply the pins for `host`
    pub fn run(
        &mut self,
        host: &mut dyn HostConfig,
        installer: &mut dyn Installer,
    ) -> ExtensionResult<Resolution> {
        let settings = ExtensionSettings::from_host(&*host)?;
        self.run_with_settings(settings, host, installer)
    }

    fn run_with_settings(
        &mut self,
        settings: ExtensionSettings,
        host: &mut dyn HostConfig,
        installer: &mut dyn Installer,
    ) -> ExtensionResult<Resolution> {
        self.identities.configure(&settings);
        for source in &settings.sources {
            info!("source: {}", source);
        }

        // Selection fails before anything is fetched
        let env = &self.env;
        let platform = PlatformSelector::from_settings(&settings).resolve_with(|name| env(name))?;

        let explicit_pins = host
            .get_section(&settings.target_section)
            .map(|values| values.into_iter().collect::<VersionTable>())
            .ok_or_else(|| VerpinError::TargetSectionMissing {
                section: settings.target_section.clone(),
            })?;

        let combined = self.load_sources(&settings)?;
        let platform_pins = VersionLayering::platform_versions(&combined, &platform);

        let (mut develop, unresolved_develop_paths) =
            develop_directives(&*self.identities, &settings.develop_paths);
        develop.extend(settings.develop_packages.iter().cloned());

        let versions = VersionLayering::merge(&platform_pins.versions, &explicit_pins, &develop);
        apply_versions(&versions, &settings.target_section, host, installer)?;

        info!(
            "{} pins written to [{}] for platform '{}'",
            versions.len(),
            settings.target_section,
            platform
        );

        Ok(Resolution {
            platform,
            platform_found: platform_pins.found,
            available_platforms: platform_pins.available,
            sources: settings.sources,
            target_section: settings.target_section,
            develop,
            unresolved_develop_paths,
            versions,
        })
    }

    /// Load and combine every configured source
    pub fn load_sources(&self, settings: &ExtensionSettings) -> ExtensionResult<ConfigTable> {
        SourceAggregator::new(&self.loader).load(&settings.sources)
    }
}

/// Replace the host's `target` section with `versions` and notify the installer
pub fn apply_versions(
    versions: &VersionTable,
    target: &str,
    host: &mut dyn HostConfig,
    installer: &mut dyn Installer,
) -> ExtensionResult<()> {
    if !host.has_section(target) {
        return Err(VerpinError::TargetSectionMissing {
            section: target.to_string(),
        });
    }

    host.set_section(target, versions)?;
    installer.set_default_versions(versions);

    for (name, version) in versions.iter() {
        debug!("{} = {}", name, version);
    }

    Ok(())
}

/// `start` hook: run with the default loader and identity resolver
pub fn start(
    host: &mut dyn HostConfig,
    installer: &mut dyn Installer,
) -> ExtensionResult<Resolution> {
    let settings = ExtensionSettings::from_host(&*host)?;
    let loader = UriLoader::new(settings.resource_paths.clone())?;
    PlatformVersions::new(loader).run_with_settings(settings, host, installer)
}

/// `start` hook with caller supplied collaborators
pub fn start_with<L: ResourceLoader>(
    loader: L,
    identities: Box<dyn PackageIdentityResolver>,
    host: &mut dyn HostConfig,
    installer: &mut dyn Installer,
) -> ExtensionResult<Resolution> {
    PlatformVersions::new(loader)
        .with_identities(identities)
        .run(host, installer)
}

/// `finish` hook; nothing to do
pub fn finish(_host: &dyn HostConfig) -> ExtensionResult<()> {
    Ok(())
}
