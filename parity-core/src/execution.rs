//! Execution logic for running the programs under comparison.

use std::fmt::Display;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;

use crate::error::Error;
use crate::interrupt::{InterruptWaiter, Interrupts};
use crate::render::{RenderSink, Style};
use crate::trace_categories;

/// Text reported for both output streams of an interrupted execution.
pub const INTERRUPTED: &str = "<INTERRUPTED>";

/// Identifies one of the two programs under comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Program {
    /// The trusted implementation.
    Reference,
    /// The implementation being checked against the reference.
    Candidate,
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Candidate => write!(f, "candidate"),
        }
    }
}

/// Configuration for one program under comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramConfig {
    /// Command used to launch the program; case arguments are appended to it.
    pub command: String,
    /// Human-readable name of the program.
    pub label: String,
}

impl ProgramConfig {
    /// Creates a new program configuration.
    pub fn new(command: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            label: label.into(),
        }
    }

    /// Returns the full command line used to run this program with the given arguments.
    pub fn command_line(&self, args: &str) -> String {
        if args.is_empty() {
            self.command.clone()
        } else {
            std::format!("{} {args}", self.command)
        }
    }
}

/// How the two programs of a case are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Run the reference to completion, then the candidate.
    #[default]
    Sequential,
    /// Launch both programs before awaiting either.
    Concurrent,
}

/// Configuration for the process runner.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// The reference program.
    pub reference: ProgramConfig,
    /// The candidate program.
    pub candidate: ProgramConfig,
    /// How the two programs are scheduled.
    pub mode: ExecutionMode,
    /// Shell used to split arguments and launch both programs.
    pub shell: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            reference: ProgramConfig::new("reference-program", "reference"),
            candidate: ProgramConfig::new("candidate-program", "candidate"),
            mode: ExecutionMode::Sequential,
            shell: PathBuf::from("sh"),
        }
    }
}

impl RunnerConfig {
    /// Returns the configuration of the given program.
    pub const fn program(&self, program: Program) -> &ProgramConfig {
        match program {
            Program::Reference => &self.reference,
            Program::Candidate => &self.candidate,
        }
    }
}

/// Observable outcome of running one program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code; `None` if the run was interrupted or the program failed to launch.
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    /// Returns the result reported for an interrupted execution.
    pub fn interrupted() -> Self {
        Self {
            stdout: INTERRUPTED.into(),
            stderr: INTERRUPTED.into(),
            exit_code: None,
        }
    }

    /// Returns the result reported when a program could not be launched.
    pub fn launch_failure(command: &str, error: &std::io::Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: std::format!("failed to launch '{command}': {error}"),
            exit_code: None,
        }
    }

    /// Returns whether this result stems from an interrupted execution.
    pub fn is_interrupted(&self) -> bool {
        self.exit_code.is_none() && self.stdout == INTERRUPTED && self.stderr == INTERRUPTED
    }
}

/// Results of running both programs for one case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionPair {
    /// Result from the reference program.
    pub reference: ExecutionResult,
    /// Result from the candidate program.
    pub candidate: ExecutionResult,
}

/// Runs both programs under comparison for a case.
#[async_trait::async_trait]
pub trait CaseExecutor: Send + Sync {
    /// Returns the human-readable name of the given program.
    fn label(&self, program: Program) -> &str;

    /// Returns the command line used to run the given program with the given arguments.
    fn describe(&self, program: Program, args: &str) -> String;

    /// Runs both programs with the given arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - Arguments passed identically to both programs.
    /// * `sink` - Where to announce which program is about to read standard input.
    async fn run_pair(
        &self,
        args: &str,
        sink: &mut dyn RenderSink,
    ) -> Result<ExecutionPair, Error>;
}

/// Launches the programs under comparison as child processes.
pub struct ProcessRunner {
    config: RunnerConfig,
    interrupts: Interrupts,
}

impl ProcessRunner {
    /// Creates a new runner that stops waiting on children when `interrupts` fires.
    pub const fn new(config: RunnerConfig, interrupts: Interrupts) -> Self {
        Self { config, interrupts }
    }

    /// Runs one program with the given arguments.
    ///
    /// Launch failures are reported through the returned result rather than as
    /// an error; errors only stem from failing to announce the run.
    pub async fn run(
        &self,
        program: Program,
        args: &str,
        sink: &mut dyn RenderSink,
    ) -> Result<ExecutionResult, Error> {
        self.announce(program, sink)?;

        let waiter = self.interrupts.subscribe();
        let spawned = self.spawn(program, args);

        self.finish(program, spawned, waiter).await
    }

    async fn run_concurrently(
        &self,
        args: &str,
        sink: &mut dyn RenderSink,
    ) -> Result<ExecutionPair, Error> {
        self.announce(Program::Reference, sink)?;
        self.announce(Program::Candidate, sink)?;

        let reference_waiter = self.interrupts.subscribe();
        let candidate_waiter = self.interrupts.subscribe();

        // Both children exist before either is awaited; an interrupt wakes both waiters.
        let reference = self.spawn(Program::Reference, args);
        let candidate = self.spawn(Program::Candidate, args);

        let (reference, candidate) = tokio::join!(
            self.finish(Program::Reference, reference, reference_waiter),
            self.finish(Program::Candidate, candidate, candidate_waiter),
        );

        Ok(ExecutionPair {
            reference: reference?,
            candidate: candidate?,
        })
    }

    fn announce(&self, program: Program, sink: &mut dyn RenderSink) -> Result<(), Error> {
        let label = &self.config.program(program).label;
        sink.line(
            &std::format!("STDIN for {label} (use RET C-d to finish or C-c to cancel):"),
            Style::Warning,
        )
    }

    fn spawn(&self, program: Program, args: &str) -> std::io::Result<Child> {
        let command_line = self.config.program(program).command_line(args);

        tracing::debug!(target: trace_categories::EXECUTION, "launching {program}: {command_line}");

        tokio::process::Command::new(&self.config.shell)
            .arg("-c")
            .arg(&command_line)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }

    async fn finish(
        &self,
        program: Program,
        spawned: std::io::Result<Child>,
        mut waiter: InterruptWaiter,
    ) -> Result<ExecutionResult, Error> {
        match spawned {
            Ok(child) => {
                let result = collect(child, &mut waiter).await?;
                tracing::debug!(
                    target: trace_categories::EXECUTION,
                    "{program} finished: exit code {:?}",
                    result.exit_code
                );
                Ok(result)
            }
            Err(e) => {
                let command = &self.config.program(program).command;
                tracing::debug!(target: trace_categories::EXECUTION, "failed to launch {program}: {e}");
                Ok(ExecutionResult::launch_failure(command, &e))
            }
        }
    }
}

#[async_trait::async_trait]
impl CaseExecutor for ProcessRunner {
    fn label(&self, program: Program) -> &str {
        &self.config.program(program).label
    }

    fn describe(&self, program: Program, args: &str) -> String {
        self.config.program(program).command_line(args)
    }

    async fn run_pair(
        &self,
        args: &str,
        sink: &mut dyn RenderSink,
    ) -> Result<ExecutionPair, Error> {
        match self.config.mode {
            ExecutionMode::Sequential => {
                let reference = self.run(Program::Reference, args, sink).await?;
                let candidate = self.run(Program::Candidate, args, sink).await?;
                Ok(ExecutionPair {
                    reference,
                    candidate,
                })
            }
            ExecutionMode::Concurrent => self.run_concurrently(args, sink).await,
        }
    }
}

/// Waits for the child to exit while capturing its output, unless interrupted first.
async fn collect(mut child: Child, waiter: &mut InterruptWaiter) -> Result<ExecutionResult, Error> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let completed = tokio::select! {
        biased;
        () = waiter.wait() => None,
        captured = capture(&mut child, stdout, stderr) => Some(captured),
    };

    let Some(captured) = completed else {
        terminate(&mut child).await;
        return Ok(ExecutionResult::interrupted());
    };

    let (status, stdout, stderr) = captured?;

    // A terminal Ctrl-C reaches the child too, and its death may be reaped
    // before the harness observes the signal.
    if waiter.has_fired() || died_of_interrupt(status) {
        tracing::debug!(target: trace_categories::EXECUTION, "child ended by interrupt: {status}");
        return Ok(ExecutionResult::interrupted());
    }

    Ok(ExecutionResult {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_code: Some(exit_code_of(status)),
    })
}

async fn capture(
    child: &mut Child,
    stdout: Option<impl AsyncRead + Unpin>,
    stderr: Option<impl AsyncRead + Unpin>,
) -> std::io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    tokio::try_join!(child.wait(), read_all(stdout), read_all(stderr))
}

async fn read_all(stream: Option<impl AsyncRead + Unpin>) -> std::io::Result<Vec<u8>> {
    let mut buffer = vec![];
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buffer).await?;
    }
    Ok(buffer)
}

/// Kills the child and reaps it so that it does not linger as a zombie.
async fn terminate(child: &mut Child) {
    tracing::debug!(target: trace_categories::EXECUTION, "terminating interrupted child {:?}", child.id());

    if let Err(e) = child.kill().await {
        tracing::warn!("failed to terminate child process: {e}");
    }
}

/// Returns whether the child was killed by `SIGINT`.
fn died_of_interrupt(status: ExitStatus) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        const SIGINT: i32 = 2;
        status.signal() == Some(SIGINT)
    }

    #[cfg(not(unix))]
    {
        let _ = status;
        false
    }
}

/// Maps an exit status to a numeric code, reporting signal deaths the way shells do.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
