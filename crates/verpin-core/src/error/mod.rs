//! Error types and result aliases for verpin operations.
//!
//! Every fatal condition of a run maps to one variant here. Non-fatal
//! conditions (an unknown platform section, a develop path without a
//! discoverable package) are logged by the caller and never become errors.

use thiserror::Error;

/// Unified error type for all verpin operations
#[derive(Error, Debug)]
pub enum VerpinError {
    // Platform selection
    #[error("Missing required config ${{{section}:default-platform}}")]
    MissingDefaultPlatform { section: String },

    // Source loading
    #[error("Failed to load source '{uri}': {reason}")]
    SourceFetch {
        uri: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to parse {origin}: {message} at line {line}")]
    IniParse {
        origin: String,
        line: usize,
        message: String,
    },

    // Section inheritance
    #[error("Section inheritance cycle detected: {cycle}")]
    InheritanceCycle { cycle: String },

    #[error("Section '{section}' extends unknown section '{parent}'")]
    MissingParentSection { section: String, parent: String },

    // Host configuration
    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Target version section '{section}' does not exist")]
    TargetSectionMissing { section: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for verpin operations
pub type VerpinResult<T> = Result<T, VerpinError>;

impl VerpinError {
    /// Create a source fetch error from any error type
    pub fn source_fetch<E>(uri: impl Into<String>, reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SourceFetch {
            uri: uri.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            VerpinError::MissingDefaultPlatform { .. } => {
                Some("Set 'default-platform' in the config section or export the variable named by 'platform-env'")
            },
            VerpinError::SourceFetch { .. } => {
                Some("Check that every entry in 'sources' exists and is reachable")
            },
            VerpinError::InheritanceCycle { .. } => {
                Some("Remove one of the '<<=' markers so sections no longer extend each other")
            },
            VerpinError::MissingParentSection { .. } => {
                Some("Check the spelling of the section named after '<<='")
            },
            VerpinError::TargetSectionMissing { .. } => {
                Some("Add an empty versions section to the build configuration")
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_default_platform_message() {
        let err = VerpinError::MissingDefaultPlatform {
            section: "platform-versions-config".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required config ${platform-versions-config:default-platform}"
        );
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_source_fetch_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = VerpinError::source_fetch("versions.cfg", "read failed", io);
        assert!(err.to_string().contains("versions.cfg"));
        assert_eq!(err.source().unwrap().to_string(), "no such file");
    }

    #[test]
    fn test_no_suggestion_for_parse_errors() {
        let err = VerpinError::IniParse {
            origin: "a.cfg".to_string(),
            line: 3,
            message: "missing delimiter".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse a.cfg: missing delimiter at line 3");
        assert!(err.suggestion().is_none());
    }
}
