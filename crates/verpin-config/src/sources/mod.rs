//! Source aggregation
//!
//! Loads every source URI in order into one [`ConfigTable`] and expands
//! section inheritance once all of them are merged. Loading is sequential
//! and all-or-nothing: the first failing source aborts the aggregation.

use tracing::{debug, info};

use verpin_core::error::VerpinError;
use verpin_core::loader::ResourceLoader;

use crate::enhance::expand_inheritance;
use crate::ini::ConfigTable;
use crate::ConfigResult;

/// Combines version sources through a [`ResourceLoader`]
pub struct SourceAggregator<L> {
    loader: L,
}

impl<L: ResourceLoader> SourceAggregator<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Load `uris` in order into one expanded table
    pub fn load<S: AsRef<str>>(&self, uris: &[S]) -> ConfigResult<ConfigTable> {
        let mut combined = ConfigTable::new();

        for uri in uris {
            let uri = uri.as_ref();
            info!("loading versions from {}", uri);
            combined.merge(self.load_one(uri)?);
        }

        expand_inheritance(&mut combined)?;
        debug!("combined sections: {:?}", combined.section_names());

        Ok(combined)
    }

    fn load_one(&self, uri: &str) -> ConfigResult<ConfigTable> {
        let bytes = self.loader.fetch(uri)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| VerpinError::source_fetch(uri, "content is not valid UTF-8", e))?;
        ConfigTable::parse(&content, uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use verpin_core::error::VerpinResult;

    /// In-memory loader recording the order of fetches
    struct StubLoader {
        files: HashMap<String, String>,
        fetched: RefCell<Vec<String>>,
    }

    impl StubLoader {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                fetched: RefCell::new(Vec::new()),
            }
        }
    }

    impl ResourceLoader for StubLoader {
        fn fetch(&self, uri: &str) -> VerpinResult<Vec<u8>> {
            self.fetched.borrow_mut().push(uri.to_string());
            self.files
                .get(uri)
                .map(|content| content.as_bytes().to_vec())
                .ok_or_else(|| VerpinError::SourceFetch {
                    uri: uri.to_string(),
                    reason: "not found".to_string(),
                    source: None,
                })
        }
    }

    const VERSIONS_1: &str = "[current]\nbeta = 2.0\ngamma = 9.0\n\n[next]\n<<= <current\ngamma = 10.0\n";

    #[test]
    fn test_load_expands_inheritance() {
        let aggregator = SourceAggregator::new(StubLoader::new(&[("versions_1.cfg", VERSIONS_1)]));
        let table = aggregator.load(&["versions_1.cfg"]).unwrap();

        let next = table.versions("next").unwrap();
        assert_eq!(next.get("beta"), Some("2.0"));
        assert_eq!(next.get("gamma"), Some("10.0"));
    }

    #[test]
    fn test_later_sources_override() {
        let loader = StubLoader::new(&[
            ("base.cfg", VERSIONS_1),
            ("site.cfg", "[current]\nbeta = 2.1\n"),
        ]);
        let aggregator = SourceAggregator::new(&loader);
        let table = aggregator.load(&["base.cfg", "site.cfg"]).unwrap();

        assert_eq!(table.get("current", "beta"), Some("2.1"));
        // Inheritance runs after merging, so the override flows into children
        assert_eq!(table.get("next", "beta"), Some("2.1"));
        assert_eq!(*loader.fetched.borrow(), vec!["base.cfg", "site.cfg"]);
    }

    #[test]
    fn test_parent_may_come_from_another_source() {
        let loader = StubLoader::new(&[
            ("child.cfg", "[next]\n<<= <current\ngamma = 10.0\n"),
            ("parent.cfg", "[current]\nbeta = 2.0\n"),
        ]);
        let table = SourceAggregator::new(loader)
            .load(&["child.cfg", "parent.cfg"])
            .unwrap();
        assert_eq!(table.get("next", "beta"), Some("2.0"));
    }

    #[test]
    fn test_failure_aborts_remaining_sources() {
        let loader = StubLoader::new(&[("base.cfg", VERSIONS_1), ("late.cfg", VERSIONS_1)]);
        let aggregator = SourceAggregator::new(&loader);

        let err = aggregator.load(&["base.cfg", "missing.cfg", "late.cfg"]).unwrap_err();

        assert!(matches!(err, VerpinError::SourceFetch { ref uri, .. } if uri == "missing.cfg"));
        assert_eq!(*loader.fetched.borrow(), vec!["base.cfg", "missing.cfg"]);
    }

    #[test]
    fn test_empty_source_list() {
        let aggregator = SourceAggregator::new(StubLoader::new(&[]));
        let table = aggregator.load::<&str>(&[]).unwrap();
        assert_eq!(table.sections().count(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_fetch_failure() {
        struct BinaryLoader;
        impl ResourceLoader for BinaryLoader {
            fn fetch(&self, _uri: &str) -> VerpinResult<Vec<u8>> {
                Ok(vec![0xff, 0xfe, 0x00])
            }
        }

        let err = SourceAggregator::new(BinaryLoader).load(&["blob.cfg"]).unwrap_err();
        assert!(matches!(err, VerpinError::SourceFetch { .. }));
    }
}
