//! Command-line arguments for the `parity` harness.

use std::path::PathBuf;

use clap::{Parser, builder::styling};
use parity_core::CaseFilter;

use crate::{events, productinfo};

const SHORT_DESCRIPTION: &str = "Interactive differential tester for command-line utilities";

const LONG_DESCRIPTION: &str = const_format::concatcp!(
    r"
parity runs every case of a case-definition file against a reference program and a candidate program,
shows both outputs side by side, and lets you accept, skip or mark each comparison.

Cases whose exit codes differ, or where only one program wrote to stdout or stderr, are auto-marked.

More information: ",
    productinfo::PRODUCT_DISPLAY_URI
);

const VERSION: &str = const_format::concatcp!(
    productinfo::PRODUCT_VERSION,
    " (",
    productinfo::PRODUCT_GIT_VERSION,
    ")"
);

/// Parsed command-line arguments for the parity harness.
#[derive(Parser)]
#[clap(name = productinfo::PRODUCT_NAME,
       version = VERSION,
       about = SHORT_DESCRIPTION,
       long_about = LONG_DESCRIPTION,
       disable_help_flag = true,
       disable_version_flag = true,
       styles = parity_help_styles())]
#[allow(clippy::module_name_repetitions)]
pub struct CommandLineArgs {
    /// Display usage information.
    #[clap(long = "help", action = clap::ArgAction::HelpLong)]
    pub help: Option<bool>,

    /// Display version.
    #[clap(long = "version", action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// List the parsed test cases and exit.
    #[clap(short = 'l', long = "list")]
    pub list: bool,

    /// Only list or run custom test cases.
    #[clap(short = 'c', long = "custom-only")]
    pub custom_only: bool,

    /// Include only these test cases (as numbered in --list).
    #[clap(
        short = 'i',
        long = "include",
        value_name = "CASE_NUMS",
        num_args = 0..,
        conflicts_with = "exclude"
    )]
    pub include: Option<Vec<u32>>,

    /// Exclude these test cases (as numbered in --list).
    #[clap(short = 'e', long = "exclude", value_name = "CASE_NUMS", num_args = 0..)]
    pub exclude: Option<Vec<u32>>,

    /// Path to the case-definition file.
    #[clap(long = "cases", value_name = "PATH", env = "PARITY_CASES")]
    pub cases: Option<PathBuf>,

    /// Command used to launch the reference program.
    #[clap(long = "reference", value_name = "COMMAND", env = "PARITY_REFERENCE")]
    pub reference: Option<String>,

    /// Command used to launch the candidate program.
    #[clap(long = "candidate", value_name = "COMMAND", env = "PARITY_CANDIDATE")]
    pub candidate: Option<String>,

    /// Launch both programs of a case at the same time.
    #[clap(long = "concurrent")]
    pub concurrent: bool,

    /// Show a line diff when both programs wrote differing output.
    #[clap(long = "diff")]
    pub show_diff: bool,

    /// Path to a configuration file to use instead of the default.
    #[clap(long = "config", value_name = "PATH", conflicts_with = "no_config")]
    pub config_file: Option<PathBuf>,

    /// Don't load any configuration file.
    #[clap(long = "no-config")]
    pub no_config: bool,

    /// Disable colorized output.
    #[clap(long = "disable-color")]
    pub disable_color: bool,

    /// Enable debug logging for classes of tracing events.
    #[clap(long = "debug", value_name = "EVENT")]
    pub enabled_debug_events: Vec<events::TraceEvent>,
}

impl CommandLineArgs {
    /// Returns the case filter selected by `--include` or `--exclude`.
    pub fn case_filter(&self) -> CaseFilter {
        match (&self.include, &self.exclude) {
            (Some(include), _) => CaseFilter::Include(include.iter().copied().collect()),
            (None, Some(exclude)) => CaseFilter::Exclude(exclude.iter().copied().collect()),
            (None, None) => CaseFilter::All,
        }
    }
}

/// Returns clap styling to be used for command-line help.
#[doc(hidden)]
fn parity_help_styles() -> clap::builder::Styles {
    styling::Styles::styled()
        .header(
            styling::AnsiColor::Yellow.on_default()
                | styling::Effects::BOLD
                | styling::Effects::UNDERLINE,
        )
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}
