//! Command implementations and dispatch logic.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use verpin_core::error::{VerpinError, VerpinResult};

pub mod resolve;
pub mod sections;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
}

impl CommandContext {
    pub fn new() -> VerpinResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| VerpinError::io("Failed to get current directory", e))?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| VerpinError::io("Current directory is not valid UTF-8", e.into_io_error()))?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
        })
    }

    /// Resolve a command line path against the working directory
    pub fn resolve_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> VerpinResult<()> {
    match command {
        Commands::Resolve { config, format, write } => {
            info!("Resolving versions for {}", config);
            resolve::execute(&config, format, write, ctx)
        }
        Commands::Sections { config } => sections::execute(&config, ctx),
        Commands::Version => {
            show_version();
            Ok(())
        }
    }
}

fn show_version() {
    println!("verpin {}", env!("CARGO_PKG_VERSION"));
    println!("build date: {}", env!("BUILD_DATE"));
    println!("rustc: {}", env!("RUSTC_VERSION"));
    println!("target: {}", env!("VERPIN_TARGET"));
}
