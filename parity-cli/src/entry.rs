//! Implements the command-line interface for the `parity` harness.

use std::io::IsTerminal;

use clap::Parser;
use parity_core::{
    Interrupts, Navigator, NavigatorOptions, ProcessRunner, RenderSink, RunOutcome, TestCase,
    load_cases, reporting,
};
use parity_interactive::{StdinInput, TerminalOptions, TerminalSink};

use crate::args::CommandLineArgs;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::events;
use crate::productinfo;

/// Main entry point for the `parity` harness.
pub fn run() {
    install_panic_handlers();

    let args: Vec<String> = std::env::args().collect();

    let parsed_args = match CommandLineArgs::try_parse_from(&args) {
        Ok(parsed_args) => parsed_args,
        Err(e) => {
            let _ = e.print();

            // clap reports `--help` and `--version` as errors too.
            let exit_code = match e.kind() {
                clap::error::ErrorKind::DisplayVersion | clap::error::ErrorKind::DisplayHelp => 0,
                _ => 1,
            };

            std::process::exit(exit_code);
        }
    };

    let exit_code = match run_with_runtime(&args, parsed_args) {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("error: {err:#}");
            1
        }
    };

    std::process::exit(exit_code);
}

fn run_with_runtime(cli_args: &[String], args: CommandLineArgs) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let result = runtime.block_on(run_async(cli_args, args));

    // An interrupted prompt leaves a blocking read of stdin behind; don't wait on it.
    runtime.shutdown_background();

    result
}

/// Installs panic handlers to report our panic and cleanly exit on panic.
fn install_panic_handlers() {
    //
    // Set up panic handler. On release builds, it will capture panic details to a
    // temporary .toml file and report a human-readable message to the screen.
    //
    human_panic::setup_panic!(
        human_panic::Metadata::new(productinfo::PRODUCT_NAME, productinfo::PRODUCT_VERSION)
            .homepage(productinfo::PRODUCT_DISPLAY_URI)
            .support(const_format::concatcp!(
                "please file an issue at ",
                productinfo::PRODUCT_DISPLAY_URI
            ))
    );

    //
    // If stdout is connected to a terminal, restore its colors and cursor before
    // handing off to the previously registered handler.
    //
    if std::io::stdout().is_terminal() {
        let original_panic_handler = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = crossterm::execute!(
                std::io::stdout(),
                crossterm::style::ResetColor,
                crossterm::cursor::Show,
                crossterm::cursor::MoveToNextLine(1),
            );

            original_panic_handler(panic_info);
        }));
    }
}

/// Runs the harness.
///
/// # Arguments
///
/// * `cli_args` - The command-line arguments, in string form.
/// * `args` - The already-parsed command-line arguments.
async fn run_async(cli_args: &[String], args: CommandLineArgs) -> Result<(), CliError> {
    let event_config = events::TraceEventConfig::init(&args.enabled_debug_events);
    tracing::debug!("enabled trace events: {:?}", event_config.enabled_events());

    let config = load_effective_config(&args)?;

    let cases_path = config.cases_path(&args);
    let parsed = load_cases(&cases_path, &config.to_parse_options(&args))?;

    let invocation = invocation(cli_args);

    let mut sink = TerminalSink::stdout(TerminalOptions {
        disable_color: args.disable_color,
        clear_screen: std::io::stdout().is_terminal(),
        width: None,
    });

    if args.list {
        sink.clear(None)?;
        reporting::render_case_list(&mut sink, &parsed, &invocation)?;
        return Ok(());
    }

    let interrupts = Interrupts::from_ctrl_c();
    let runner = ProcessRunner::new(config.to_runner_config(&args), interrupts.clone());
    let mut input = StdinInput::new(interrupts, args.disable_color);

    let mut cases = parsed.cases;
    let outcome = Navigator::new(
        &runner,
        &mut sink,
        &mut input,
        NavigatorOptions {
            show_diff: args.show_diff,
        },
    )
    .run(&mut cases)
    .await;

    finish_run(&mut sink, outcome, &cases, &invocation)
}

/// Reports how the run ended and summarizes the cases, even when the run failed.
fn finish_run(
    sink: &mut dyn RenderSink,
    outcome: Result<RunOutcome, parity_core::Error>,
    cases: &[TestCase],
    invocation: &str,
) -> Result<(), CliError> {
    let (outcome, failure) = match outcome {
        Ok(outcome) => (outcome, None),
        Err(e) => (RunOutcome::Aborted, Some(e)),
    };

    let reported = sink
        .clear(Some(&reporting::final_banner(outcome, invocation)))
        .and_then(|()| reporting::render_summary(sink, cases));

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(reported?),
    }
}

fn load_effective_config(args: &CommandLineArgs) -> Result<Config, CliError> {
    let result = config::load_config(args.no_config, args.config_file.as_deref());

    match result.error {
        None => Ok(result.config),
        Some(source) if result.explicit_path => Err(CliError::Config {
            path: result.path.unwrap_or_default(),
            source,
        }),
        Some(error) => {
            let path = result.path.unwrap_or_default();
            tracing::warn!("ignoring config file {}: {error}", path.display());
            Ok(result.config)
        }
    }
}

/// Returns the invocation shown in the list title and the final banner.
fn invocation(cli_args: &[String]) -> String {
    std::iter::once(productinfo::PRODUCT_NAME)
        .chain(cli_args.iter().skip(1).map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
