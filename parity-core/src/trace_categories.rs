//! Trace utilities

/// Trace category for running the programs under comparison.
pub const EXECUTION: &str = "execution";
/// Trace category for the case navigation loop.
pub const NAVIGATION: &str = "navigation";
/// Trace category for parsing case-definition files.
pub const PARSE: &str = "parse";
