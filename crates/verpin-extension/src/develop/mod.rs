//! Package identity discovery for develop paths
//!
//! A project checked out for development is pinned to its own version. Its
//! name and version are found by asking the project's build script
//! (`setup.py --name --version`) and, failing that, by reading installed
//! package metadata (`*.egg-info/PKG-INFO`, `*.dist-info/METADATA`).

use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error, warn};

use verpin_config::settings::{ExtensionSettings, DEFAULT_BUILD_INTERPRETER, DEFAULT_BUILD_SCRIPT};
use verpin_core::error::VerpinError;
use verpin_core::types::{DevelopDirective, PackageIdentity};

use crate::ExtensionResult;

/// Metadata files looked for under a develop path, in order
const METADATA_PATTERNS: &[&str] = &[
    "*.egg-info/PKG-INFO",
    "*.dist-info/METADATA",
    "PKG-INFO",
    "src/*.egg-info/PKG-INFO",
];

/// Result of running a build script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    pub success: bool,
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
}

/// Runs a program out of process
pub trait ScriptRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> ExtensionResult<ScriptOutput>;
}

/// [`ScriptRunner`] spawning real processes; blocks until exit
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ScriptRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> ExtensionResult<ScriptOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| VerpinError::io(format!("Failed to run '{}'", program), e))?;

        Ok(ScriptOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Finds the package living at a develop path
pub trait PackageIdentityResolver {
    /// Pick up run settings before any path is resolved
    fn configure(&mut self, _settings: &ExtensionSettings) {}

    /// Identify the package at `path`, or `None` when it cannot be found
    fn resolve(&self, path: &Utf8Path) -> Option<PackageIdentity>;
}

/// Default resolver: build script first, installed metadata second
pub struct ProjectIdentityResolver {
    runner: Box<dyn ScriptRunner>,
    interpreter: String,
    build_script: String,
}

impl ProjectIdentityResolver {
    pub fn new(runner: Box<dyn ScriptRunner>) -> Self {
        Self {
            runner,
            interpreter: DEFAULT_BUILD_INTERPRETER.to_string(),
            build_script: DEFAULT_BUILD_SCRIPT.to_string(),
        }
    }

    /// Ask the project's build script for `name version`
    pub fn from_build_script(&self, path: &Utf8Path) -> Option<PackageIdentity> {
        let script = path.join(&self.build_script);
        if !script.is_file() {
            debug!("no {} in '{}'", self.build_script, path);
            return None;
        }

        // The script runs inside `path`, so it is named relative to it
        let args: Vec<String> = ["-S", "-s", self.build_script.as_str(), "--name", "--version"]
            .iter()
            .map(|arg| arg.to_string())
            .collect();
        let command = format!("{} {} (in {})", self.interpreter, args.join(" "), path);

        let output = match self.runner.run(&self.interpreter, &args, path) {
            Ok(output) => output,
            Err(e) => {
                error!("Unable to run '{}': {}", command, e);
                return None;
            }
        };

        if !output.success {
            error!(
                "'{}' failed with return code '{}'",
                command,
                output.code.map_or_else(|| "signal".to_string(), |code| code.to_string())
            );
            return None;
        }

        let identity = PackageIdentity::from_tokens(&output.stdout);
        if identity.is_none() {
            warn!("'{}' did not print a name and version", command);
        }
        identity
    }

    /// Read installed package metadata under `path`
    pub fn from_metadata(&self, path: &Utf8Path) -> Option<PackageIdentity> {
        match discover_metadata(path) {
            Ok(identity) => identity,
            Err(e) => {
                error!("Unable to read package metadata at '{}': {}", path, e);
                None
            }
        }
    }
}

impl Default for ProjectIdentityResolver {
    fn default() -> Self {
        Self::new(Box::new(ProcessRunner))
    }
}

impl PackageIdentityResolver for ProjectIdentityResolver {
    fn configure(&mut self, settings: &ExtensionSettings) {
        self.interpreter = settings.build_interpreter.clone();
        self.build_script = settings.build_script.clone();
    }

    fn resolve(&self, path: &Utf8Path) -> Option<PackageIdentity> {
        self.from_build_script(path)
            .or_else(|| self.from_metadata(path))
    }
}

/// Forced-pin directives for every develop path that can be identified
///
/// Paths without an identity are logged and returned separately; they
/// contribute no directive.
pub fn develop_directives(
    resolver: &dyn PackageIdentityResolver,
    paths: &[Utf8PathBuf],
) -> (Vec<DevelopDirective>, Vec<Utf8PathBuf>) {
    let mut directives = Vec::new();
    let mut unresolved = Vec::new();

    for path in paths {
        match resolver.resolve(path) {
            Some(identity) => {
                debug!("develop path '{}' is {}", path, identity);
                directives.push(identity.into());
            }
            None => {
                error!("Unable to find a package name at '{}'", path);
                unresolved.push(path.clone());
            }
        }
    }

    (directives, unresolved)
}

/// Look for `Name:`/`Version:` metadata files under `path`
pub fn discover_metadata(path: &Utf8Path) -> ExtensionResult<Option<PackageIdentity>> {
    if !path.is_dir() {
        debug!("'{}' is not a directory", path);
        return Ok(None);
    }

    let base = glob::Pattern::escape(path.as_str());
    for pattern in METADATA_PATTERNS {
        let full = format!("{}/{}", base, pattern);
        let entries = glob::glob(&full).map_err(|e| VerpinError::ConfigValidation {
            field: "develop".to_string(),
            reason: format!("invalid metadata pattern '{}': {}", full, e),
        })?;

        for entry in entries {
            let file = entry.map_err(|e| {
                let message = format!("Failed to scan {}", e.path().display());
                VerpinError::io(message, e.into_error())
            })?;
            let text = std::fs::read_to_string(&file)
                .map_err(|e| VerpinError::io(format!("Failed to read {}", file.display()), e))?;

            if let Some(identity) = parse_metadata(&text) {
                debug!("found {} in {}", identity, file.display());
                return Ok(Some(identity));
            }
        }
    }

    Ok(None)
}

/// Read `Name` and `Version` from an RFC 822 style metadata header block
fn parse_metadata(text: &str) -> Option<PackageIdentity> {
    let mut name = None;
    let mut version = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            break;
        }
        let Some((header, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if header.eq_ignore_ascii_case("name") && name.is_none() {
            name = Some(value.to_string());
        } else if header.eq_ignore_ascii_case("version") && version.is_none() {
            version = Some(value.to_string());
        }
    }

    match (name, version) {
        (Some(name), Some(version)) if !name.is_empty() && !version.is_empty() => {
            Some(PackageIdentity::new(name, version))
        }
        _ => None,
    }
}
