//! Develop directive and package identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction to unpin or force-pin a package under development
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopDirective {
    pub name: String,
    /// `None` removes any pin, `Some` forces this version
    pub version: Option<String>,
}

impl DevelopDirective {
    /// Directive removing any pin for `name`
    pub fn unpin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Directive forcing `name` to `version`
    pub fn pin(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    pub fn is_unpin(&self) -> bool {
        self.version.is_none()
    }
}

impl fmt::Display for DevelopDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}={}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Name and version discovered for a project checked out for development
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
}

impl PackageIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse whitespace separated `name version` output, ignoring any
    /// trailing tokens
    pub fn from_tokens(text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let name = tokens.next()?;
        let version = tokens.next()?;
        Some(Self::new(name, version))
    }
}

impl From<PackageIdentity> for DevelopDirective {
    fn from(identity: PackageIdentity) -> Self {
        DevelopDirective::pin(identity.name, identity.version)
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens() {
        let identity = PackageIdentity::from_tokens("gamma\n1.0.0.d\n").unwrap();
        assert_eq!(identity, PackageIdentity::new("gamma", "1.0.0.d"));

        assert!(PackageIdentity::from_tokens("gamma").is_none());
        assert!(PackageIdentity::from_tokens("   \n").is_none());
    }

    #[test]
    fn test_identity_becomes_forced_pin() {
        let directive: DevelopDirective = PackageIdentity::new("gamma", "1.0").into();
        assert!(!directive.is_unpin());
        assert_eq!(directive.to_string(), "gamma=1.0");
        assert_eq!(DevelopDirective::unpin("gamma").to_string(), "gamma");
    }
}
