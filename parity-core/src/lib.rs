//! Core of the parity differential-testing harness.
//!
//! The harness runs a list of test cases against two implementations of the
//! same command-line utility (a trusted *reference* and a *candidate* under
//! test) and walks an operator through the resulting comparisons:
//!
//! 1. [`cases`] parses a case-definition file into [`TestCase`] records.
//! 2. [`execution`] runs both programs for a case, capturing their output.
//! 3. [`comparison`] flags obvious mismatches so they are auto-marked.
//! 4. [`navigation`] drives the operator through the cases, one decision at a time.
//! 5. [`reporting`] summarizes what still needs attention once the run is over.

pub mod cases;
mod error;
pub mod comparison;
pub mod execution;
mod input;
mod interrupt;
pub mod navigation;
pub mod render;
pub mod reporting;
mod trace_categories;

pub use cases::{CaseFilter, CaseStatus, ParseOptions, ParsedCases, TestCase, load_cases};
pub use comparison::Classification;
pub use error::Error;
pub use execution::{
    CaseExecutor, ExecutionMode, ExecutionPair, ExecutionResult, ProcessRunner, Program,
    ProgramConfig, RunnerConfig,
};
pub use input::{OperatorInput, ReadResult, ScriptedInput};
pub use interrupt::{InterruptWaiter, Interrupts};
pub use navigation::{Navigator, NavigatorOptions, RunOutcome};
pub use render::{Banner, RenderSink, Style, Transcript};
