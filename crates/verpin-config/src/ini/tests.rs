//! Unit tests for INI parsing

use super::*;

const VERSIONS_1: &str = r#"
[current]
beta = 2.0
gamma = 9.0

[next]
<<= <current
gamma = 10.0
"#;

#[test]
fn test_parse_sections_and_marker() {
    let table = parse_ini(VERSIONS_1, "versions_1.cfg").unwrap();

    assert_eq!(table.section_names(), vec!["current", "next"]);
    assert_eq!(table.get("current", "beta"), Some("2.0"));

    let next = table.section("next").unwrap();
    assert_eq!(next.extends, vec!["current".to_string()]);
    assert_eq!(next.values.len(), 1);
    assert!(next.get(EXTENDS_KEY).is_none());
}

#[test]
fn test_continuation_lines_and_comments() {
    let content = r#"
[platform-versions-config]
# where the platform pins live
sources =
    /opt/platform/base.cfg
    ; commented out
    http://pins.example.com/extra.cfg
default-platform: current ; inline comment
"#;

    let table = parse_ini(content, "buildout.cfg").unwrap();
    assert_eq!(
        table.get("platform-versions-config", "sources"),
        Some("\n/opt/platform/base.cfg\nhttp://pins.example.com/extra.cfg")
    );
    assert_eq!(table.get("platform-versions-config", "default-platform"), Some("current"));
}

#[test]
fn test_keys_are_case_sensitive() {
    let table = parse_ini("[v]\nDjango = 1.4\ndjango = 1.5\n", "case.cfg").unwrap();
    assert_eq!(table.get("v", "Django"), Some("1.4"));
    assert_eq!(table.get("v", "django"), Some("1.5"));
}

#[test]
fn test_default_section_fills_items() {
    let content = "[DEFAULT]\nsix = 1.16\n\n[current]\nbeta = 2.0\n\n[legacy]\nsix = 1.10\n";
    let table = parse_ini(content, "defaults.cfg").unwrap();

    assert_eq!(table.section_names(), vec!["current", "legacy"]);
    assert_eq!(table.get("current", "six"), Some("1.16"));
    assert_eq!(table.items("legacy").unwrap().get("six").map(String::as_str), Some("1.10"));
    assert_eq!(table.versions("current").unwrap().len(), 2);
}

#[test]
fn test_key_before_header_is_error() {
    let err = parse_ini("beta = 2.0\n[current]\n", "broken.cfg").unwrap_err();
    match err {
        VerpinError::IniParse { origin, line, .. } => {
            assert_eq!(origin, "broken.cfg");
            assert_eq!(line, 1);
        }
        other => panic!("Expected IniParse error, got {:?}", other),
    }
}

#[test]
fn test_missing_delimiter_is_error() {
    let err = parse_ini("[current]\nbeta 2.0\n", "broken.cfg").unwrap_err();
    assert!(matches!(err, VerpinError::IniParse { line: 2, .. }));

    let err = parse_ini("[current\nbeta = 2.0\n", "broken.cfg").unwrap_err();
    assert!(matches!(err, VerpinError::IniParse { line: 1, .. }));
}

#[test]
fn test_merge_later_wins() {
    let mut table = parse_ini(VERSIONS_1, "versions_1.cfg").unwrap();
    let later = parse_ini("[current]\ngamma = 9.1\ndelta = 4.0\n\n[legacy]\nbeta = 1.0\n", "later.cfg").unwrap();

    table.merge(later);

    assert_eq!(table.section_names(), vec!["current", "next", "legacy"]);
    assert_eq!(table.get("current", "beta"), Some("2.0"));
    assert_eq!(table.get("current", "gamma"), Some("9.1"));
    assert_eq!(table.get("current", "delta"), Some("4.0"));
    // A later source without a marker keeps the earlier one
    assert_eq!(table.section("next").unwrap().extends, vec!["current".to_string()]);
}

#[test]
fn test_multiple_parents() {
    let table = parse_ini("[a]\nx = 1\n[b]\ny = 2\n[c]\n<<= <a\n    <b\n", "multi.cfg").unwrap();
    assert_eq!(
        table.section("c").unwrap().extends,
        vec!["a".to_string(), "b".to_string()]
    );
}

#[test]
fn test_render_and_reparse() {
    let mut table = parse_ini(VERSIONS_1, "versions_1.cfg").unwrap();
    table.set("buildout", "develop", "\nsrc/alpha\nsrc/beta");

    let rendered = table.to_ini_string();
    assert!(rendered.contains("[next]\n<<= <current\ngamma = 10.0\n"));
    assert!(rendered.contains("develop =\n    src/alpha\n    src/beta\n"));

    let reparsed = parse_ini(&rendered, "rendered.cfg").unwrap();
    assert_eq!(reparsed, table);
}

#[test]
fn test_host_config_replaces_section() {
    let mut table = parse_ini("[versions]\nalpha = 1.0\nstale = 0.1\n", "buildout.cfg").unwrap();
    let pins: VersionTable = [("alpha", "1.0"), ("beta", "2.0")].into_iter().collect();

    table.set_section("versions", &pins).unwrap();

    let section = table.get_section("versions").unwrap();
    assert_eq!(section.len(), 2);
    assert!(!section.contains_key("stale"));
    assert_eq!(table.get_key("versions", "beta"), Some("2.0".to_string()));
    assert!(!table.has_section("missing"));
}
