//! Unit tests for CLI commands.

use super::*;
use crate::OutputFormat;
use std::fs;
use tempfile::TempDir;
use verpin_config::ini::parse_ini;
use verpin_extension::{MemoryHost, RecordingInstaller};

const VERSIONS: &str = "\
[current]
beta = 2.0
gamma = 9.0

[next]
<<= <current
gamma = 10.0
";

fn create_test_context(temp_dir: &TempDir) -> CommandContext {
    CommandContext {
        cwd: Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap(),
        output: crate::output::OutputHandler::plain(),
    }
}

/// A build configuration next to a `versions.cfg` source
fn create_project(temp_dir: &TempDir, platform: &str) -> Utf8PathBuf {
    let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    fs::write(dir.join("versions.cfg"), VERSIONS).unwrap();
    fs::write(
        dir.join("buildout.cfg"),
        format!(
            "[buildout]\nparts =\n\n[platform-versions-config]\nsources = ${{buildout:directory}}/versions.cfg\ndefault-platform = {}\n\n[versions]\nalpha = 1.0\n",
            platform
        ),
    )
    .unwrap();
    dir.join("buildout.cfg")
}

#[test]
fn test_resolve_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);

    assert_eq!(ctx.resolve_path(Utf8Path::new("buildout.cfg")), ctx.cwd.join("buildout.cfg"));
    assert_eq!(ctx.resolve_path(Utf8Path::new("/etc/buildout.cfg")), Utf8PathBuf::from("/etc/buildout.cfg"));
}

#[test]
fn test_resolve_writes_target_section() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    let config = create_project(&temp_dir, "next");

    resolve::execute(Utf8Path::new("buildout.cfg"), OutputFormat::Text, true, &ctx).unwrap();

    let written = parse_ini(&fs::read_to_string(&config).unwrap(), "buildout.cfg").unwrap();
    assert_eq!(written.get("versions", "alpha"), Some("1.0"));
    assert_eq!(written.get("versions", "beta"), Some("2.0"));
    assert_eq!(written.get("versions", "gamma"), Some("10.0"));
    assert_eq!(
        written.get("platform-versions-config", "sources"),
        Some("${buildout:directory}/versions.cfg")
    );
}

#[test]
fn test_resolve_without_write_leaves_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    let config = create_project(&temp_dir, "current");
    let before = fs::read_to_string(&config).unwrap();

    resolve::execute(&config, OutputFormat::Json, false, &ctx).unwrap();

    assert_eq!(fs::read_to_string(&config).unwrap(), before);
}

#[test]
fn test_resolve_missing_default_platform() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    create_project(&temp_dir, "");

    let err = resolve::execute(Utf8Path::new("buildout.cfg"), OutputFormat::Text, false, &ctx).unwrap_err();
    assert!(matches!(err, VerpinError::MissingDefaultPlatform { .. }));
}

#[test]
fn test_render_formats() {
    let mut host = MemoryHost::new()
        .with_section("versions", &[("alpha", "1.0")])
        .with_section("platform-versions-config", &[("default-platform", "current")]);
    let mut installer = RecordingInstaller::new();
    let resolution = verpin_extension::start(&mut host, &mut installer).unwrap();

    let text = resolve::render(&resolution, OutputFormat::Text).unwrap();
    assert_eq!(text, "# platform: current\nalpha = 1.0\n");

    let json = resolve::render(&resolution, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["versions"]["alpha"], "1.0");
    assert_eq!(value["target_section"], "versions");
}

#[test]
fn test_platform_sections() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = create_project(&temp_dir, "next");

    let (sections, default_platform) = sections::platform_sections(&config).unwrap();

    assert_eq!(sections, vec!["current", "next"]);
    assert_eq!(default_platform.as_deref(), Some("next"));
}
