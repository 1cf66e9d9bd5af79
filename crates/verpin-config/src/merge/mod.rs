//! Version layering: platform pins, explicit pins and develop directives
//!
//! Layers are applied lowest priority first and each one fully overwrites
//! conflicting keys:
//!
//! 1. platform pins from the selected source section
//! 2. explicit pins already in the host's version section
//! 3. develop directives, in declaration order

use tracing::{info, warn};

use verpin_core::types::{DevelopDirective, VersionTable};

use crate::ini::ConfigTable;

/// Platform pins looked up from the combined source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPins {
    pub versions: VersionTable,
    /// `false` when the platform section does not exist
    pub found: bool,
    /// Every section the combined configuration defines
    pub available: Vec<String>,
}

/// Stateless layering of version sources
pub struct VersionLayering;

impl VersionLayering {
    /// Look up the pins of `platform` in the combined configuration
    ///
    /// A missing section is not an error: the valid section names are
    /// logged and the platform contributes nothing.
    pub fn platform_versions(combined: &ConfigTable, platform: &str) -> PlatformPins {
        let available = combined.section_names();

        match combined.versions(platform) {
            Some(versions) => PlatformPins {
                versions,
                found: true,
                available,
            },
            None => {
                warn!("'{}' does not exist", platform);
                warn!("Valid choices are:");
                for section in &available {
                    warn!("\t{}", section);
                }
                PlatformPins {
                    versions: VersionTable::new(),
                    found: false,
                    available,
                }
            }
        }
    }

    /// Layer explicit pins and develop directives over platform pins
    pub fn merge(
        platform_versions: &VersionTable,
        explicit_pins: &VersionTable,
        develop_directives: &[DevelopDirective],
    ) -> VersionTable {
        let mut merged = platform_versions.clone();

        // Explicit pins of the project trump the platform
        merged.overlay(explicit_pins);

        for directive in develop_directives {
            match &directive.version {
                None => info!("Unpinning '{}' for development.", directive.name),
                Some(version) => {
                    info!("Pinning '{}' to '{}' for development.", directive.name, version)
                }
            }
            merged.apply_directive(directive);
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::parse_ini;
    use proptest::prelude::*;

    fn table(pins: &[(&str, &str)]) -> VersionTable {
        pins.iter().copied().collect()
    }

    #[test]
    fn test_explicit_beats_platform() {
        let merged = VersionLayering::merge(&table(&[("a", "1")]), &table(&[("a", "2")]), &[]);
        assert_eq!(merged, table(&[("a", "2")]));
    }

    #[test]
    fn test_unpin_beats_explicit() {
        let merged = VersionLayering::merge(
            &table(&[("a", "1")]),
            &table(&[("a", "2")]),
            &[DevelopDirective::unpin("a")],
        );
        assert!(merged.is_empty());
    }

    #[test]
    fn test_forced_pin_beats_everything() {
        let merged = VersionLayering::merge(
            &table(&[("a", "1")]),
            &table(&[("a", "2")]),
            &[DevelopDirective::pin("a", "3")],
        );
        assert_eq!(merged, table(&[("a", "3")]));
    }

    #[test]
    fn test_directives_apply_in_order() {
        let merged = VersionLayering::merge(
            &table(&[("a", "1")]),
            &VersionTable::new(),
            &[DevelopDirective::pin("a", "3"), DevelopDirective::unpin("a")],
        );
        assert!(merged.is_empty());

        let merged = VersionLayering::merge(
            &table(&[("a", "1")]),
            &VersionTable::new(),
            &[DevelopDirective::unpin("a"), DevelopDirective::pin("a", "3")],
        );
        assert_eq!(merged, table(&[("a", "3")]));
    }

    #[test]
    fn test_platform_versions_lookup() {
        let combined = parse_ini("[current]\nbeta = 2.0\n", "versions.cfg").unwrap();

        let pins = VersionLayering::platform_versions(&combined, "current");
        assert!(pins.found);
        assert_eq!(pins.versions, table(&[("beta", "2.0")]));

        let pins = VersionLayering::platform_versions(&combined, "tes_100");
        assert!(!pins.found);
        assert!(pins.versions.is_empty());
    }

    #[test]
    fn test_missing_platform_lists_valid_sections() {
        let combined = parse_ini(
            "[DEFAULT]\nzeta = 1.0\n\n[current]\nbeta = 2.0\n\n[next]\n<<= <current\n",
            "versions.cfg",
        )
        .unwrap();

        let pins = VersionLayering::platform_versions(&combined, "legacy");
        assert!(!pins.found);
        assert_eq!(pins.available, vec!["current", "next"]);
    }

    fn pins_strategy() -> impl Strategy<Value = VersionTable> {
        prop::collection::btree_map("[a-e]", "[0-9]\\.[0-9]", 0..5).prop_map(VersionTable::from)
    }

    proptest! {
        #[test]
        fn prop_explicit_pins_always_survive(platform in pins_strategy(), explicit in pins_strategy()) {
            let merged = VersionLayering::merge(&platform, &explicit, &[]);
            for (name, version) in explicit.iter() {
                prop_assert_eq!(merged.get(name), Some(version));
            }
            for (name, version) in platform.iter() {
                if !explicit.contains(name) {
                    prop_assert_eq!(merged.get(name), Some(version));
                }
            }
        }

        #[test]
        fn prop_unpin_always_removes(platform in pins_strategy(), explicit in pins_strategy(), name in "[a-e]") {
            let merged = VersionLayering::merge(&platform, &explicit, &[DevelopDirective::unpin(name.clone())]);
            prop_assert!(!merged.contains(&name));
        }

        #[test]
        fn prop_empty_platform_yields_explicit(explicit in pins_strategy()) {
            let merged = VersionLayering::merge(&VersionTable::new(), &explicit, &[]);
            prop_assert_eq!(merged, explicit);
        }
    }
}
