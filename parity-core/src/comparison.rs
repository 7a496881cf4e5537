//! Classification of the differences between two executions.

use crate::cases::CaseStatus;
use crate::execution::{ExecutionPair, ExecutionResult};

/// Obvious mismatches observed between the reference and candidate runs of a case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// The two exit codes differ; an absent exit code is a distinct value.
    pub exit_mismatch: bool,
    /// Exactly one of the two programs wrote to stdout.
    pub stdout_presence_mismatch: bool,
    /// Exactly one of the two programs wrote to stderr.
    pub stderr_presence_mismatch: bool,
}

impl Classification {
    /// Classifies the results of running both programs for a case.
    pub fn classify(reference: &ExecutionResult, candidate: &ExecutionResult) -> Self {
        Self {
            exit_mismatch: reference.exit_code != candidate.exit_code,
            stdout_presence_mismatch: reference.stdout.is_empty() != candidate.stdout.is_empty(),
            stderr_presence_mismatch: reference.stderr.is_empty() != candidate.stderr.is_empty(),
        }
    }

    /// Classifies an execution pair.
    pub fn of_pair(pair: &ExecutionPair) -> Self {
        Self::classify(&pair.reference, &pair.candidate)
    }

    /// Returns whether the case must be flagged without operator involvement.
    pub const fn should_auto_mark(&self) -> bool {
        self.exit_mismatch || self.stdout_presence_mismatch || self.stderr_presence_mismatch
    }

    /// Applies the classification to a case status.
    ///
    /// A case that is already auto-marked stays auto-marked.
    pub const fn apply(&self, status: CaseStatus) -> CaseStatus {
        if self.should_auto_mark() {
            CaseStatus::AutoMarked
        } else {
            status
        }
    }

    /// Returns the reasons for auto-marking, in display order.
    pub fn reasons(&self) -> Vec<&'static str> {
        let mut reasons = vec![];
        if self.exit_mismatch {
            reasons.push("exit codes differ");
        }
        if self.stdout_presence_mismatch {
            reasons.push("only one program wrote to stdout");
        }
        if self.stderr_presence_mismatch {
            reasons.push("only one program wrote to stderr");
        }
        reasons
    }

    /// Returns whether both programs wrote to stdout but with differing content.
    pub fn stdout_content_differs(pair: &ExecutionPair) -> bool {
        content_differs(&pair.reference.stdout, &pair.candidate.stdout)
    }

    /// Returns whether both programs wrote to stderr but with differing content.
    pub fn stderr_content_differs(pair: &ExecutionPair) -> bool {
        content_differs(&pair.reference.stderr, &pair.candidate.stderr)
    }
}

/// Returns whether both outputs are present yet not identical.
///
/// Informational only; content differences never cause auto-marking.
pub fn content_differs(reference: &str, candidate: &str) -> bool {
    !reference.is_empty() && !candidate.is_empty() && reference != candidate
}

/// One line of a line-oriented diff between two outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// Present only in the reference output.
    Reference(String),
    /// Present in both outputs.
    Both(String),
    /// Present only in the candidate output.
    Candidate(String),
}

/// Computes a line diff between the reference and candidate outputs.
pub fn line_diff(reference: &str, candidate: &str) -> Vec<DiffLine> {
    diff::lines(reference, candidate)
        .into_iter()
        .map(|d| match d {
            diff::Result::Left(l) => DiffLine::Reference(l.to_owned()),
            diff::Result::Both(l, _) => DiffLine::Both(l.to_owned()),
            diff::Result::Right(r) => DiffLine::Candidate(r.to_owned()),
        })
        .collect()
}
