//! Reporting of parsed cases and of the outcome of a run.

use crate::cases::{CaseStatus, ParsedCases, TestCase};
use crate::error::Error;
use crate::navigation::RunOutcome;
use crate::render::{Align, Banner, Cell, RenderSink, Style, Table};

/// A report bucket grouping cases that need the operator's attention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    /// Cases never resolved before the run ended.
    Unreached,
    /// Cases the operator skipped.
    Skipped,
    /// Cases flagged by the operator or automatically.
    Marked,
}

impl Bucket {
    /// All buckets, in report order.
    pub const ALL: [Self; 3] = [Self::Unreached, Self::Skipped, Self::Marked];

    /// Returns the bucket a case with the given status is reported in, if any.
    pub const fn of(status: CaseStatus) -> Option<Self> {
        match status {
            CaseStatus::Pending => Some(Self::Unreached),
            CaseStatus::Skipped => Some(Self::Skipped),
            CaseStatus::Marked | CaseStatus::AutoMarked => Some(Self::Marked),
            CaseStatus::Accepted => None,
        }
    }

    /// Returns the bucket's display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unreached => "UNREACHED",
            Self::Skipped => "SKIPPED",
            Self::Marked => "MARKED",
        }
    }

    const fn style(self) -> Style {
        match self {
            Self::Unreached => Style::Muted,
            Self::Skipped => Style::Warning,
            Self::Marked => Style::Failure,
        }
    }
}

/// Cases grouped into report buckets.
#[derive(Debug, Default)]
pub struct Summary<'a> {
    /// Cases left pending.
    pub unreached: Vec<&'a TestCase>,
    /// Skipped cases.
    pub skipped: Vec<&'a TestCase>,
    /// Marked and auto-marked cases.
    pub marked: Vec<&'a TestCase>,
    /// Number of accepted cases.
    pub accepted: usize,
}

impl<'a> Summary<'a> {
    /// Groups the given cases by their final status.
    pub fn of(cases: &'a [TestCase]) -> Self {
        let mut summary = Self::default();
        for case in cases {
            match Bucket::of(case.status) {
                Some(Bucket::Unreached) => summary.unreached.push(case),
                Some(Bucket::Skipped) => summary.skipped.push(case),
                Some(Bucket::Marked) => summary.marked.push(case),
                None => summary.accepted += 1,
            }
        }
        summary
    }

    /// Returns the cases in the given bucket.
    pub fn bucket(&self, bucket: Bucket) -> &[&'a TestCase] {
        match bucket {
            Bucket::Unreached => &self.unreached,
            Bucket::Skipped => &self.skipped,
            Bucket::Marked => &self.marked,
        }
    }
}

/// Renders the end-of-run summary: one table per non-empty bucket, and an
/// acknowledgment for each empty one.
pub fn render_summary(sink: &mut dyn RenderSink, cases: &[TestCase]) -> Result<(), Error> {
    let summary = Summary::of(cases);

    for bucket in Bucket::ALL {
        let members = summary.bucket(bucket);
        sink.blank()?;

        if members.is_empty() {
            sink.line(
                &std::format!("Summary: No {} cases. Well done!", bucket.name()),
                Style::Italic,
            )?;
            continue;
        }

        let mut table = Table::new(std::format!("Summary: {} Cases", bucket.name()))
            .column("Num", Align::Right, Style::Accent)
            .column("Line", Align::Right, Style::Plain)
            .column("Options", Align::Left, bucket.style())
            .column("Context", Align::Left, Style::Muted);

        for case in members {
            table.push_row(
                [
                    Cell::from(case.num.to_string()),
                    Cell::from(case.source_line.to_string()),
                    Cell::from(case.command.as_str()),
                    Cell::from(case.context.as_deref().unwrap_or_default()),
                ],
                None,
            );
        }

        sink.table(&table)?;
    }

    sink.blank()
}

/// Renders the table of parsed cases followed by a count of what was loaded.
pub fn render_case_list(
    sink: &mut dyn RenderSink,
    parsed: &ParsedCases,
    invocation: &str,
) -> Result<(), Error> {
    let mut table = Table::new(std::format!("Test Cases\n$ {invocation}"))
        .column("Num", Align::Right, Style::Accent)
        .column("Line", Align::Right, Style::Plain)
        .column("Options", Align::Left, Style::Plain)
        .column("Context", Align::Left, Style::Muted)
        .column("Custom", Align::Left, Style::Plain);

    for case in &parsed.cases {
        table.push_row(
            [
                Cell::from(case.num.to_string()),
                Cell::from(case.source_line.to_string()),
                Cell::from(case.command.as_str()),
                Cell::from(case.context.as_deref().unwrap_or_default()),
                Cell::from(case.is_custom.to_string()),
            ],
            None,
        );
    }

    sink.table(&table)?;
    sink.blank()?;
    sink.line(&loaded_message(parsed), Style::Warning)?;
    sink.blank()
}

/// Returns the message reporting how many cases were loaded.
pub fn loaded_message(parsed: &ParsedCases) -> String {
    std::format!(
        "Loaded {} ({} provided, {} custom) test cases!",
        parsed.total(),
        parsed.provided_count,
        parsed.custom_count
    )
}

/// Returns the banner shown once the run is over.
///
/// # Arguments
///
/// * `outcome` - How the run ended.
/// * `invocation` - The command line the harness was invoked with.
pub fn final_banner(outcome: RunOutcome, invocation: &str) -> Banner {
    match outcome {
        RunOutcome::Completed => Banner::new(
            std::format!("You ran all test cases as loaded by:\n$ {invocation}"),
            Style::Success,
        ),
        RunOutcome::Aborted => Banner::new(
            std::format!("Script ended early. You ran:\n$ {invocation}"),
            Style::Failure,
        ),
    }
}
