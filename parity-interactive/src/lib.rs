//! Interactive layer of the parity harness: a terminal-backed render sink and
//! an operator input backend reading from standard input.

mod stdin_input;
mod terminal;

pub use stdin_input::StdinInput;
pub use terminal::{TerminalOptions, TerminalSink};
