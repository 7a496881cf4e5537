//! Error facilities

use std::path::PathBuf;

/// Monolithic error type for the harness core.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The case-definition file could not be opened or read.
    #[error("failed to read case file {0}: {1}")]
    CaseFileUnreadable(PathBuf, std::io::Error),

    /// An error occurred while reading operator input.
    #[error("failed to read operator input: {0}")]
    InputError(std::io::Error),

    /// An error occurred while rendering output for the operator.
    #[error("failed to render output: {0}")]
    RenderError(std::io::Error),

    /// A background task failed to run to completion.
    #[error("background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// A generic I/O error occurred.
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
}
