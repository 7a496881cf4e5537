//! Operator input sources.

use std::collections::VecDeque;

use crate::error::Error;

/// Result of reading a line of operator input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// The operator entered a line of input.
    Input(String),
    /// End of input was reached.
    Eof,
    /// The operator interrupted the read.
    Interrupted,
}

/// Source of operator commands.
#[async_trait::async_trait]
pub trait OperatorInput: Send {
    /// Reads one line of input after displaying the given prompt.
    async fn read_line(&mut self, prompt: &str) -> Result<ReadResult, Error>;
}

/// Operator input replayed from a fixed list of read results.
///
/// Once the results run out, every read reports end of input.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    results: VecDeque<ReadResult>,
}

impl ScriptedInput {
    /// Creates scripted input yielding the given lines in order.
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self::from_results(lines.into_iter().map(|line| ReadResult::Input(line.into())))
    }

    /// Creates scripted input yielding the given read results in order.
    pub fn from_results(results: impl IntoIterator<Item = ReadResult>) -> Self {
        Self {
            results: results.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl OperatorInput for ScriptedInput {
    async fn read_line(&mut self, _prompt: &str) -> Result<ReadResult, Error> {
        Ok(self.results.pop_front().unwrap_or(ReadResult::Eof))
    }
}
