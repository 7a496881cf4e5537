//! Command-line front end for the parity differential-testing harness.

pub mod args;
pub mod config;
pub mod entry;
mod error;
pub mod events;
mod productinfo;

pub use error::CliError;
