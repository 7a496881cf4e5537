//! Configuration file support for the parity harness.
//!
//! Configuration is TOML-based and layered: defaults < config file <
//! command-line arguments (and their environment variables). Unknown fields
//! are ignored so that older builds keep working with newer files.

use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use parity_core::cases::{DEFAULT_BARRIER, DEFAULT_EMPTY_COMMAND};
use parity_core::{ExecutionMode, ParseOptions, ProgramConfig, RunnerConfig};

use crate::args::CommandLineArgs;

/// Case-definition file used when none is configured.
pub const DEFAULT_CASES_PATH: &str = "test_cases";

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE_NAME: &str = "parity.toml";

/// Root configuration structure.
///
/// All fields are optional to support forward compatibility and partial configuration.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the case-definition file.
    pub cases: Option<PathBuf>,

    /// How the two programs of a case are scheduled.
    pub execution: Option<ExecutionSetting>,

    /// The reference program.
    pub reference: ProgramSection,

    /// The candidate program.
    pub candidate: ProgramSection,

    /// Case-definition file format.
    pub format: FormatSection,
}

/// Scheduling of the two programs of a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionSetting {
    /// One after the other.
    Sequential,
    /// Both at once.
    Concurrent,
}

/// Configuration of one program under comparison.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ProgramSection {
    /// Command used to launch the program.
    pub command: Option<String>,

    /// Human-readable name of the program.
    pub label: Option<String>,
}

/// Case-definition file format options.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct FormatSection {
    /// Line separating provided cases from custom ones.
    pub barrier: Option<String>,

    /// Sentinel standing in for a case without arguments.
    #[serde(rename = "empty-command")]
    pub empty_command: Option<String>,
}

impl Config {
    /// Returns the case-definition file to load.
    pub fn cases_path(&self, args: &CommandLineArgs) -> PathBuf {
        args.cases
            .clone()
            .or_else(|| self.cases.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CASES_PATH))
    }

    /// Returns the options used to parse the case-definition file.
    pub fn to_parse_options(&self, args: &CommandLineArgs) -> ParseOptions {
        ParseOptions {
            filter: args.case_filter(),
            custom_only: args.custom_only,
            barrier: self
                .format
                .barrier
                .clone()
                .unwrap_or_else(|| DEFAULT_BARRIER.to_owned()),
            empty_command: self
                .format
                .empty_command
                .clone()
                .unwrap_or_else(|| DEFAULT_EMPTY_COMMAND.to_owned()),
        }
    }

    /// Returns the runner configuration, merging the file with command-line arguments.
    pub fn to_runner_config(&self, args: &CommandLineArgs) -> RunnerConfig {
        let defaults = RunnerConfig::default();

        let mode = if args.concurrent {
            ExecutionMode::Concurrent
        } else {
            match self.execution {
                Some(ExecutionSetting::Concurrent) => ExecutionMode::Concurrent,
                Some(ExecutionSetting::Sequential) | None => ExecutionMode::Sequential,
            }
        };

        RunnerConfig {
            reference: self
                .reference
                .merge(args.reference.as_deref(), defaults.reference),
            candidate: self
                .candidate
                .merge(args.candidate.as_deref(), defaults.candidate),
            mode,
            shell: defaults.shell,
        }
    }
}

impl ProgramSection {
    /// Merges this section with a command given on the command line.
    ///
    /// An explicit label wins; otherwise a configured command labels itself.
    fn merge(&self, cli_command: Option<&str>, defaults: ProgramConfig) -> ProgramConfig {
        let command = cli_command
            .map(ToOwned::to_owned)
            .or_else(|| self.command.clone());

        let label = self.label.clone().or_else(|| command.clone());

        ProgramConfig {
            command: command.unwrap_or(defaults.command),
            label: label.unwrap_or(defaults.label),
        }
    }
}

/// Result of attempting to load a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration, or default if loading failed.
    pub config: Config,

    /// The path that was used (or attempted) for loading.
    pub path: Option<PathBuf>,

    /// Any error that occurred during loading.
    pub error: Option<ConfigLoadError>,

    /// Whether the path was explicitly provided by the user (via `--config`).
    /// If true and there's an error, the harness fails rather than continuing.
    pub explicit_path: bool,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[source] std::io::Error),

    /// Failed to parse the TOML content.
    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Returns the per-user configuration file path for the current platform.
///
/// Returns `None` if the platform's config directory cannot be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("parity").join("config.toml"))
}

/// Returns the configuration file used when none is given explicitly.
///
/// A `parity.toml` in the working directory takes precedence over the
/// per-user file.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
    if local.is_file() {
        Some(local)
    } else {
        user_config_path()
    }
}

/// Loads configuration from the specified path.
pub fn load_from_path(path: &Path) -> ConfigLoadResult {
    let loaded = std::fs::read_to_string(path)
        .map_err(ConfigLoadError::Io)
        .and_then(|content| toml::from_str::<Config>(&content).map_err(ConfigLoadError::Parse));

    let (config, error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    ConfigLoadResult {
        config,
        path: Some(path.to_path_buf()),
        error,
        explicit_path: false,
    }
}

/// Loads configuration based on the provided options.
///
/// # Arguments
///
/// * `disabled` - If true, skip loading and return defaults.
/// * `explicit_path` - If provided, use this path instead of the default.
pub fn load_config(disabled: bool, explicit_path: Option<&Path>) -> ConfigLoadResult {
    let defaults = |path| ConfigLoadResult {
        config: Config::default(),
        path,
        error: None,
        explicit_path: false,
    };

    if disabled {
        return defaults(None);
    }

    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return defaults(None),
        },
    };

    // A missing default file is not an error.
    if explicit_path.is_none() && !path.exists() {
        return defaults(Some(path));
    }

    let mut result = load_from_path(&path);
    result.explicit_path = explicit_path.is_some();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> anyhow::Result<Config> {
        Ok(toml::from_str(toml)?)
    }

    fn args(argv: &[&str]) -> anyhow::Result<CommandLineArgs> {
        let mut full = vec!["parity", "--no-config"];
        full.extend(argv);
        Ok(CommandLineArgs::try_parse_from(full)?)
    }

    #[test]
    fn empty_config() -> anyhow::Result<()> {
        let config = parse("")?;
        assert!(config.cases.is_none());
        assert!(config.execution.is_none());
        assert!(config.reference.command.is_none());
        assert!(config.format.barrier.is_none());
        Ok(())
    }

    #[test]
    fn full_config() -> anyhow::Result<()> {
        let config = parse(
            r#"
            cases = "shuf_cases"
            execution = "concurrent"

            [reference]
            command = "shuf"
            label = "GNU shuf"

            [candidate]
            command = "python3 shuf.py"

            [format]
            barrier = "=== custom ==="
            empty-command = "<none>"
        "#,
        )?;

        assert_eq!(config.cases, Some(PathBuf::from("shuf_cases")));
        assert_eq!(config.execution, Some(ExecutionSetting::Concurrent));
        assert_eq!(config.reference.label.as_deref(), Some("GNU shuf"));
        assert_eq!(config.format.barrier.as_deref(), Some("=== custom ==="));
        assert_eq!(config.format.empty_command.as_deref(), Some("<none>"));
        Ok(())
    }

    #[test]
    fn unknown_fields_ignored() -> anyhow::Result<()> {
        let config = parse(
            r#"
            future-option = 3

            [reference]
            command = "shuf"
            colour = "blue"

            [unknown-section]
            foo = "bar"
        "#,
        )?;

        assert_eq!(config.reference.command.as_deref(), Some("shuf"));
        Ok(())
    }

    #[test]
    fn invalid_execution_mode_is_rejected() {
        let result: Result<Config, _> = toml::from_str(r#"execution = "parallel""#);
        assert!(result.is_err());
    }

    #[test]
    fn runner_config_defaults() -> anyhow::Result<()> {
        let runner = Config::default().to_runner_config(&args(&[])?);

        assert_eq!(runner.reference, ProgramConfig::new("reference-program", "reference"));
        assert_eq!(runner.candidate, ProgramConfig::new("candidate-program", "candidate"));
        assert_eq!(runner.mode, ExecutionMode::Sequential);
        Ok(())
    }

    #[test]
    fn config_file_overrides_defaults() -> anyhow::Result<()> {
        let config = parse(
            r#"
            execution = "concurrent"

            [reference]
            command = "shuf"
            label = "GNU shuf"

            [candidate]
            command = "python3 shuf.py"
        "#,
        )?;

        let runner = config.to_runner_config(&args(&[])?);

        assert_eq!(runner.reference, ProgramConfig::new("shuf", "GNU shuf"));
        assert_eq!(
            runner.candidate,
            ProgramConfig::new("python3 shuf.py", "python3 shuf.py")
        );
        assert_eq!(runner.mode, ExecutionMode::Concurrent);
        Ok(())
    }

    #[test]
    fn command_line_overrides_config_file() -> anyhow::Result<()> {
        let config = parse(
            r#"
            cases = "from_config"

            [reference]
            command = "shuf"
            label = "GNU shuf"
        "#,
        )?;
        let args = args(&["--reference", "gshuf", "--concurrent", "--cases", "mine"])?;

        let runner = config.to_runner_config(&args);

        assert_eq!(runner.reference, ProgramConfig::new("gshuf", "GNU shuf"));
        assert_eq!(runner.mode, ExecutionMode::Concurrent);
        assert_eq!(config.cases_path(&args), PathBuf::from("mine"));
        Ok(())
    }

    #[test]
    fn parse_options_follow_format_section() -> anyhow::Result<()> {
        let config = parse(
            r#"
            [format]
            barrier = "-- mine --"
        "#,
        )?;

        let options = config.to_parse_options(&args(&["-c", "-e", "4"])?);

        assert!(options.custom_only);
        assert_eq!(options.barrier, "-- mine --");
        assert_eq!(options.empty_command, DEFAULT_EMPTY_COMMAND);
        assert!(!options.filter.admits(4));
        Ok(())
    }

    #[test]
    fn load_config_disabled() {
        let result = load_config(true, None);
        assert!(result.path.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_nonexistent_explicit() {
        let result = load_config(false, Some(Path::new("/nonexistent/path/to/parity.toml")));
        assert!(result.explicit_path);
        assert!(matches!(result.error, Some(ConfigLoadError::Io(_))));
    }

    #[test]
    fn user_config_path_shape() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with("parity/config.toml"));
        }
    }
}
