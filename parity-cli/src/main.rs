//! Implements the command-line interface for the `parity` harness.

/// Main entry point for the `parity` harness.
fn main() {
    parity_cli::entry::run();
}
