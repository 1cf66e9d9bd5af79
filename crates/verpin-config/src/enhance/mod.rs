//! Section inheritance expansion
//!
//! A section carrying `<<= <parent` receives every key of `parent` it does
//! not define itself. Parents are expanded first, so inheritance chains of
//! any depth flatten into plain sections.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use verpin_core::error::VerpinError;

use crate::ini::ConfigTable;
use crate::ConfigResult;

type Resolved = HashMap<String, IndexMap<String, String>>;

/// Expand every inheritance marker of `table` in place
///
/// With several parents, an earlier parent's key wins over a later one's.
/// Cycles fail with [`VerpinError::InheritanceCycle`], unknown parents with
/// [`VerpinError::MissingParentSection`].
pub fn expand_inheritance(table: &mut ConfigTable) -> ConfigResult<()> {
    let mut resolved = Resolved::new();
    let mut stack = Vec::new();

    for name in table.section_names() {
        resolve_section(table, &name, &mut resolved, &mut stack)?;
    }

    for (name, values) in resolved {
        if let Some(section) = table.section_mut(&name) {
            section.values = values;
        }
    }

    Ok(())
}

fn resolve_section(
    table: &ConfigTable,
    name: &str,
    resolved: &mut Resolved,
    stack: &mut Vec<String>,
) -> ConfigResult<()> {
    if resolved.contains_key(name) {
        return Ok(());
    }

    if let Some(start) = stack.iter().position(|entry| entry == name) {
        let mut cycle = stack[start..].to_vec();
        cycle.push(name.to_string());
        return Err(VerpinError::InheritanceCycle {
            cycle: cycle.join(" -> "),
        });
    }

    let Some(section) = table.section(name) else {
        return Ok(());
    };

    stack.push(name.to_string());
    let mut values = section.values.clone();

    for parent in &section.extends {
        if !table.has_section(parent) {
            return Err(VerpinError::MissingParentSection {
                section: name.to_string(),
                parent: parent.clone(),
            });
        }

        resolve_section(table, parent, resolved, stack)?;
        debug!("[{}] extends [{}]", name, parent);

        if let Some(inherited) = resolved.get(parent) {
            for (key, value) in inherited {
                if !values.contains_key(key) {
                    values.insert(key.clone(), value.clone());
                }
            }
        }
    }

    stack.pop();
    resolved.insert(name.to_string(), values);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::parse_ini;

    fn expanded(content: &str) -> ConfigResult<ConfigTable> {
        let mut table = parse_ini(content, "test.cfg")?;
        expand_inheritance(&mut table)?;
        Ok(table)
    }

    #[test]
    fn test_child_overrides_parent() {
        let table = expanded("[current]\nbeta = 2.0\ngamma = 9.0\n\n[next]\n<<= <current\ngamma = 10.0\n").unwrap();

        let next = table.versions("next").unwrap();
        assert_eq!(next.get("beta"), Some("2.0"));
        assert_eq!(next.get("gamma"), Some("10.0"));
        assert_eq!(next.len(), 2);

        // Parent untouched
        assert_eq!(table.get("current", "gamma"), Some("9.0"));
    }

    #[test]
    fn test_chain_declared_out_of_order() {
        let table = expanded("[c]\n<<= <b\nz = 3\n[b]\n<<= <a\ny = 2\n[a]\nx = 1\ny = 0\n").unwrap();

        let c = table.versions("c").unwrap();
        assert_eq!(c.get("x"), Some("1"));
        assert_eq!(c.get("y"), Some("2"));
        assert_eq!(c.get("z"), Some("3"));
    }

    #[test]
    fn test_earlier_parent_wins() {
        let table = expanded("[a]\nx = a\n[b]\nx = b\ny = b\n[c]\n<<= <a <b\n").unwrap();

        assert_eq!(table.get("c", "x"), Some("a"));
        assert_eq!(table.get("c", "y"), Some("b"));
    }

    #[test]
    fn test_cycle_detected() {
        let err = expanded("[a]\n<<= <b\n[b]\n<<= <c\n[c]\n<<= <a\n").unwrap_err();
        match err {
            VerpinError::InheritanceCycle { cycle } => assert_eq!(cycle, "a -> b -> c -> a"),
            other => panic!("Expected InheritanceCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_extension_is_cycle() {
        let err = expanded("[a]\n<<= <a\nx = 1\n").unwrap_err();
        assert!(matches!(err, VerpinError::InheritanceCycle { .. }));
    }

    #[test]
    fn test_unknown_parent() {
        let err = expanded("[next]\n<<= <current\n").unwrap_err();
        match err {
            VerpinError::MissingParentSection { section, parent } => {
                assert_eq!(section, "next");
                assert_eq!(parent, "current");
            }
            other => panic!("Expected MissingParentSection, got {:?}", other),
        }
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let mut table = expanded("[a]\nx = 1\n[b]\n<<= <a\n").unwrap();
        let once = table.clone();
        expand_inheritance(&mut table).unwrap();
        assert_eq!(table, once);
    }
}
