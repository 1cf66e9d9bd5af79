//! `verpin sections`: list the platforms the configured sources define

use camino::Utf8Path;

use verpin_config::settings::ExtensionSettings;
use verpin_core::error::VerpinResult;
use verpin_extension::PlatformVersions;
use verpin_registry::UriLoader;

use super::CommandContext;
use crate::host::FileHost;

pub fn execute(config: &Utf8Path, ctx: &CommandContext) -> VerpinResult<()> {
    let (sections, default_platform) = platform_sections(&ctx.resolve_path(config))?;

    for name in sections {
        if default_platform.as_deref() == Some(name.as_str()) {
            println!("{} {}", name, ctx.output.dim("(default)"));
        } else {
            println!("{}", name);
        }
    }

    Ok(())
}

/// Section names across all sources, and the configured default platform
pub fn platform_sections(config: &Utf8Path) -> VerpinResult<(Vec<String>, Option<String>)> {
    let host = FileHost::load(config)?;
    let settings = ExtensionSettings::from_host(&host)?;
    let loader = UriLoader::new(settings.resource_paths.clone())?;
    let combined = PlatformVersions::new(loader).load_sources(&settings)?;

    Ok((combined.section_names(), settings.default_platform))
}
