//! `verpin resolve`: run the extension against a configuration file

use camino::Utf8Path;

use verpin_core::error::{VerpinError, VerpinResult};
use verpin_extension::{finish, start, RecordingInstaller, Resolution};

use super::CommandContext;
use crate::host::FileHost;
use crate::OutputFormat;

pub fn execute(
    config: &Utf8Path,
    format: OutputFormat,
    write: bool,
    ctx: &CommandContext,
) -> VerpinResult<()> {
    let path = ctx.resolve_path(config);
    let mut host = FileHost::load(&path)?;
    let mut installer = RecordingInstaller::new();

    let resolution = start(&mut host, &mut installer)?;
    finish(&host)?;

    print!("{}", render(&resolution, format)?);

    if !resolution.platform_found {
        ctx.output.warn(&format!(
            "platform '{}' is not defined by any source",
            resolution.platform
        ));
    }
    for develop_path in &resolution.unresolved_develop_paths {
        ctx.output.warn(&format!("no package found at {}", develop_path));
    }

    if write {
        host.write()?;
        ctx.output.success(&format!(
            "Wrote {} pins to [{}] in {}",
            resolution.versions.len(),
            resolution.target_section,
            host.path()
        ));
    }

    Ok(())
}

/// Render a resolution for stdout
pub fn render(resolution: &Resolution, format: OutputFormat) -> VerpinResult<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(resolution)
                .map_err(|e| VerpinError::io("Failed to render resolution", e.into()))?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut text = format!("# platform: {}\n", resolution.platform);
            for (name, version) in resolution.versions.iter() {
                text.push_str(&format!("{} = {}\n", name, version));
            }
            Ok(text)
        }
    }
}
