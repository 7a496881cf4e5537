//! Errors reported by the command-line front end.

use std::path::PathBuf;

use crate::config::ConfigLoadError;

/// Represents an error that ends a run of the harness.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// An error occurred in the harness core.
    #[error("{0}")]
    Core(#[from] parity_core::Error),

    /// An explicitly requested configuration file could not be loaded.
    #[error("{}: {source}", path.display())]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying error.
        source: ConfigLoadError,
    },

    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),
}
