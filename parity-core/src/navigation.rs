//! The interactive loop that walks the operator through test cases.
//!
//! Each case is run against both programs, classified, and presented for a
//! decision. The operator's reply is mapped onto a new [`CaseStatus`] and a
//! [`Navigation`] decision telling the driver where to go next.

use crate::cases::{CaseStatus, TestCase};
use crate::comparison::{Classification, DiffLine, line_diff};
use crate::error::Error;
use crate::execution::{CaseExecutor, ExecutionPair, ExecutionResult, Program};
use crate::input::{OperatorInput, ReadResult};
use crate::render::{Align, Banner, Cell, RenderSink, Style, Table};
use crate::trace_categories;

const PROMPT: &str = "> ";
const BACK_HINT: &str = "You can use [b]ack to revisit the previous test case";

/// A command entered by the operator after a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Abort the run.
    Quit,
    /// Skip the case.
    Skip,
    /// Flag the case as a defect.
    Mark,
    /// Re-run the case.
    Retry,
    /// Revisit the previous case.
    Back,
    /// Accept the comparison, or move on from an auto-marked case.
    Continue,
}

impl OperatorCommand {
    /// Parses operator input, ignoring case and surrounding whitespace.
    ///
    /// Anything unrecognized (including an empty line) continues.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "q" | "quit" => Self::Quit,
            "s" | "skip" => Self::Skip,
            "m" | "mark" | "marked" => Self::Mark,
            "r" | "retry" => Self::Retry,
            "b" | "back" => Self::Back,
            _ => Self::Continue,
        }
    }
}

/// Where the driver goes after a case has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Move on to the next case.
    Advance,
    /// Run the same case again.
    Retry,
    /// Return to the previous case, or stay on the first one.
    Back,
    /// End the run early.
    Abort,
}

/// How a run of the navigation loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every case was visited.
    Completed,
    /// The operator quit before the last case was resolved.
    Aborted,
}

/// Maps an operator command onto the case's new status and the next navigation step.
///
/// Skipping and marking are unavailable for an auto-marked case; those
/// commands, like any other unrecognized input, leave it auto-marked and move on.
pub const fn transition(status: CaseStatus, command: OperatorCommand) -> (CaseStatus, Navigation) {
    let auto_marked = matches!(status, CaseStatus::AutoMarked);

    match command {
        OperatorCommand::Quit => (status, Navigation::Abort),
        OperatorCommand::Retry => (CaseStatus::Pending, Navigation::Retry),
        OperatorCommand::Back => (CaseStatus::Pending, Navigation::Back),
        _ if auto_marked => (CaseStatus::AutoMarked, Navigation::Advance),
        OperatorCommand::Skip => (CaseStatus::Skipped, Navigation::Advance),
        OperatorCommand::Mark => (CaseStatus::Marked, Navigation::Advance),
        OperatorCommand::Continue => (CaseStatus::Accepted, Navigation::Advance),
    }
}

/// Options controlling how comparisons are presented.
#[derive(Clone, Copy, Debug, Default)]
pub struct NavigatorOptions {
    /// Show a line diff when both programs wrote differing output to the same stream.
    pub show_diff: bool,
}

/// Drives the operator through a list of test cases.
pub struct Navigator<'a> {
    executor: &'a dyn CaseExecutor,
    sink: &'a mut dyn RenderSink,
    input: &'a mut dyn OperatorInput,
    options: NavigatorOptions,
}

impl<'a> Navigator<'a> {
    /// Creates a new navigator.
    ///
    /// # Arguments
    ///
    /// * `executor` - Runs both programs for each case.
    /// * `sink` - Receives everything presented to the operator.
    /// * `input` - Source of operator commands.
    /// * `options` - Presentation options.
    pub fn new(
        executor: &'a dyn CaseExecutor,
        sink: &'a mut dyn RenderSink,
        input: &'a mut dyn OperatorInput,
        options: NavigatorOptions,
    ) -> Self {
        Self {
            executor,
            sink,
            input,
            options,
        }
    }

    /// Walks through the given cases, updating their statuses in place.
    pub async fn run(&mut self, cases: &mut [TestCase]) -> Result<RunOutcome, Error> {
        let mut banner: Option<Banner> = None;
        let mut index = 0;

        while index < cases.len() {
            self.sink.clear(banner.as_ref())?;

            let num_left = cases.len() - (index + 1);
            let case = &mut cases[index];

            match self.run_case(case, num_left).await? {
                Navigation::Abort => {
                    tracing::debug!(target: trace_categories::NAVIGATION, "aborted at case {}", case.num);
                    return Ok(RunOutcome::Aborted);
                }
                Navigation::Retry => {
                    banner = Some(Banner::new(
                        "You are RETRYING this current test case",
                        Style::Accent,
                    ));
                }
                Navigation::Back => {
                    banner = Some(Banner::new(
                        "You're REVISITING the previous test case",
                        Style::Info,
                    ));
                    index = index.saturating_sub(1);
                }
                Navigation::Advance => {
                    banner = decision_banner(case.status);
                    index += 1;
                }
            }
        }

        Ok(RunOutcome::Completed)
    }

    async fn run_case(&mut self, case: &mut TestCase, num_left: usize) -> Result<Navigation, Error> {
        case.status = CaseStatus::Pending;

        tracing::debug!(target: trace_categories::NAVIGATION, "entering case {} (line {})", case.num, case.source_line);

        self.sink.panel(
            &std::format!(
                "TEST CASE {} ({num_left} left)\nContext: {}\nOptions: {}",
                case.num,
                case.context.as_deref().unwrap_or_default(),
                case.command
            ),
            Style::Accent,
        )?;
        self.sink.blank()?;

        let pair = self.executor.run_pair(&case.command, &mut *self.sink).await?;

        let classification = Classification::of_pair(&pair);
        case.status = classification.apply(case.status);

        let table = self.comparison_table(&case.command, &pair, &classification);
        self.sink.blank()?;
        self.sink.table(&table)?;

        if self.options.show_diff {
            self.render_diffs(&pair)?;
        }

        let auto_marked = case.status == CaseStatus::AutoMarked;
        if auto_marked {
            tracing::debug!(
                target: trace_categories::NAVIGATION,
                "case {} auto-marked: {}",
                case.num,
                classification.reasons().join(", ")
            );
            let explanation = self.auto_mark_explanation();
            self.sink.panel(&explanation, Style::Failure)?;
        }

        self.sink.blank()?;
        self.sink.line(
            if auto_marked {
                "[r]etry | [b]ack | [q]uit | RET or anything else to CONTINUE:"
            } else {
                "[s]kip | [m]ark | [r]etry | [b]ack | [q]uit | RET or anything else to ACCEPT:"
            },
            Style::Success,
        )?;
        self.sink.blank()?;

        let command = match self.input.read_line(PROMPT).await? {
            ReadResult::Input(line) => OperatorCommand::parse(&line),
            ReadResult::Eof | ReadResult::Interrupted => OperatorCommand::Quit,
        };

        let (status, navigation) = transition(case.status, command);
        case.status = status;

        tracing::debug!(
            target: trace_categories::NAVIGATION,
            "case {}: {command:?} -> {status} ({navigation:?})",
            case.num
        );

        Ok(navigation)
    }

    fn comparison_table(
        &self,
        args: &str,
        pair: &ExecutionPair,
        classification: &Classification,
    ) -> Table {
        let mut table = Table::new(std::format!(
            "Output Comparison ({} <--> {})",
            self.executor.label(Program::Reference),
            self.executor.label(Program::Candidate)
        ))
        .column(
            std::format!("$ {}", self.executor.describe(Program::Reference, args)),
            Align::Left,
            Style::Plain,
        )
        .column(
            std::format!("$ {}", self.executor.describe(Program::Candidate, args)),
            Align::Left,
            Style::Plain,
        )
        .with_row_separators();

        let flag = |mismatch: bool| mismatch.then_some(Style::Failure);

        table.push_row(
            [
                stream_cell(&pair.reference.stdout, "<NO STDOUT>"),
                stream_cell(&pair.candidate.stdout, "<NO STDOUT>"),
            ],
            flag(classification.stdout_presence_mismatch),
        );
        table.push_row(
            [
                stream_cell(&pair.reference.stderr, "<NO STDERR>"),
                stream_cell(&pair.candidate.stderr, "<NO STDERR>"),
            ],
            flag(classification.stderr_presence_mismatch),
        );
        table.push_row(
            [exit_code_cell(&pair.reference), exit_code_cell(&pair.candidate)],
            flag(classification.exit_mismatch),
        );

        table
    }

    fn render_diffs(&mut self, pair: &ExecutionPair) -> Result<(), Error> {
        if Classification::stdout_content_differs(pair) {
            self.render_diff("stdout", &pair.reference.stdout, &pair.candidate.stdout)?;
        }
        if Classification::stderr_content_differs(pair) {
            self.render_diff("stderr", &pair.reference.stderr, &pair.candidate.stderr)?;
        }
        Ok(())
    }

    fn render_diff(&mut self, stream: &str, reference: &str, candidate: &str) -> Result<(), Error> {
        self.sink.blank()?;
        self.sink.line(
            &std::format!(
                "Differences in {stream} (- {}, + {}):",
                self.executor.label(Program::Reference),
                self.executor.label(Program::Candidate)
            ),
            Style::Warning,
        )?;

        for line in line_diff(reference, candidate) {
            match line {
                DiffLine::Reference(l) => self.sink.line(&std::format!("- {l}"), Style::Failure)?,
                DiffLine::Both(l) => self.sink.line(&std::format!("  {l}"), Style::Muted)?,
                DiffLine::Candidate(l) => self.sink.line(&std::format!("+ {l}"), Style::Success)?,
            }
        }

        Ok(())
    }

    fn auto_mark_explanation(&self) -> String {
        std::format!(
            "The presence or absence of output and/or the exit code of {} does not match that of {}. \
             The offending comparison is highlighted. This test case is AUTO-MARKED for you.",
            self.executor.label(Program::Candidate),
            self.executor.label(Program::Reference)
        )
    }
}

/// Banner reporting the decision made on the previous case.
fn decision_banner(status: CaseStatus) -> Option<Banner> {
    let (text, style) = match status {
        CaseStatus::Accepted => ("You ACCEPTED the previous comparison", Style::Success),
        CaseStatus::Skipped => ("You SKIPPED the previous comparison", Style::Warning),
        CaseStatus::Marked => ("You MARKED the previous comparison", Style::Failure),
        CaseStatus::AutoMarked => ("The previous comparison was AUTO-MARKED", Style::Failure),
        CaseStatus::Pending => return None,
    };

    Some(Banner::new(std::format!("{text}\n{BACK_HINT}"), style))
}

fn stream_cell(output: &str, placeholder: &str) -> Cell {
    if output.is_empty() {
        Cell::styled(placeholder, Style::Muted)
    } else {
        Cell::from(output)
    }
}

fn exit_code_cell(result: &ExecutionResult) -> Cell {
    match result.exit_code {
        Some(code) => Cell::from(std::format!("Exit code: {code}")),
        None => Cell::from("Exit code: None"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{ParseOptions, parse_cases_str};
    use crate::input::ScriptedInput;
    use crate::render::{Rendered, Transcript};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Executor that records which arguments it ran and reports an exit-code
    /// mismatch for a configurable set of arguments.
    #[derive(Default)]
    struct FakeExecutor {
        runs: Mutex<Vec<String>>,
        mismatched: HashSet<String>,
        mismatched_once: HashSet<String>,
    }

    impl FakeExecutor {
        fn mismatching(args: &[&str]) -> Self {
            Self {
                mismatched: args.iter().map(|a| (*a).to_owned()).collect(),
                ..Self::default()
            }
        }

        fn mismatching_first_run(args: &[&str]) -> Self {
            Self {
                mismatched_once: args.iter().map(|a| (*a).to_owned()).collect(),
                ..Self::default()
            }
        }

        fn runs(&self) -> Vec<String> {
            self.runs.lock().map(|runs| runs.clone()).unwrap_or_default()
        }
    }

    #[async_trait::async_trait]
    impl CaseExecutor for FakeExecutor {
        fn label(&self, program: Program) -> &str {
            match program {
                Program::Reference => "ref",
                Program::Candidate => "cand",
            }
        }

        fn describe(&self, program: Program, args: &str) -> String {
            std::format!("{} {args}", self.label(program))
        }

        async fn run_pair(
            &self,
            args: &str,
            _sink: &mut dyn RenderSink,
        ) -> Result<ExecutionPair, Error> {
            let previous_runs = match self.runs.lock() {
                Ok(mut runs) => {
                    let previous = runs.iter().filter(|run| *run == args).count();
                    runs.push(args.to_owned());
                    previous
                }
                Err(_) => 0,
            };
            let mismatch = self.mismatched.contains(args)
                || (previous_runs == 0 && self.mismatched_once.contains(args));

            let output = ExecutionResult {
                stdout: std::format!("{args}\n"),
                stderr: String::new(),
                exit_code: Some(0),
            };
            let candidate = ExecutionResult {
                exit_code: Some(i32::from(mismatch)),
                ..output.clone()
            };

            Ok(ExecutionPair {
                reference: output,
                candidate,
            })
        }
    }

    fn cases(count: usize) -> Vec<TestCase> {
        let text: String = (1..=count).map(|i| std::format!("case{i}\n")).collect();
        parse_cases_str(&text, &ParseOptions::default()).cases
    }

    async fn drive(
        executor: &FakeExecutor,
        cases: &mut [TestCase],
        replies: &[&str],
        options: NavigatorOptions,
    ) -> anyhow::Result<(RunOutcome, Transcript)> {
        let mut sink = Transcript::new();
        let mut input = ScriptedInput::new(replies.iter().copied());

        let outcome = Navigator::new(executor, &mut sink, &mut input, options)
            .run(cases)
            .await?;

        Ok((outcome, sink))
    }

    fn statuses(cases: &[TestCase]) -> Vec<CaseStatus> {
        cases.iter().map(|c| c.status).collect()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(OperatorCommand::parse("q"), OperatorCommand::Quit);
        assert_eq!(OperatorCommand::parse(" QUIT \n"), OperatorCommand::Quit);
        assert_eq!(OperatorCommand::parse("S"), OperatorCommand::Skip);
        assert_eq!(OperatorCommand::parse("mark"), OperatorCommand::Mark);
        assert_eq!(OperatorCommand::parse("marked"), OperatorCommand::Mark);
        assert_eq!(OperatorCommand::parse("Retry"), OperatorCommand::Retry);
        assert_eq!(OperatorCommand::parse("b"), OperatorCommand::Back);
        assert_eq!(OperatorCommand::parse(""), OperatorCommand::Continue);
        assert_eq!(OperatorCommand::parse("looks good"), OperatorCommand::Continue);
    }

    #[test]
    fn transitions_for_pending_case() {
        let pending = CaseStatus::Pending;
        assert_eq!(
            transition(pending, OperatorCommand::Continue),
            (CaseStatus::Accepted, Navigation::Advance)
        );
        assert_eq!(
            transition(pending, OperatorCommand::Skip),
            (CaseStatus::Skipped, Navigation::Advance)
        );
        assert_eq!(
            transition(pending, OperatorCommand::Mark),
            (CaseStatus::Marked, Navigation::Advance)
        );
        assert_eq!(
            transition(pending, OperatorCommand::Retry),
            (CaseStatus::Pending, Navigation::Retry)
        );
        assert_eq!(
            transition(pending, OperatorCommand::Back),
            (CaseStatus::Pending, Navigation::Back)
        );
        assert_eq!(
            transition(pending, OperatorCommand::Quit),
            (CaseStatus::Pending, Navigation::Abort)
        );
    }

    #[test]
    fn transitions_for_auto_marked_case() {
        let auto = CaseStatus::AutoMarked;
        for command in [OperatorCommand::Skip, OperatorCommand::Mark, OperatorCommand::Continue] {
            assert_eq!(
                transition(auto, command),
                (CaseStatus::AutoMarked, Navigation::Advance)
            );
        }
        assert_eq!(
            transition(auto, OperatorCommand::Retry),
            (CaseStatus::Pending, Navigation::Retry)
        );
        assert_eq!(
            transition(auto, OperatorCommand::Quit),
            (CaseStatus::AutoMarked, Navigation::Abort)
        );
    }

    #[tokio::test]
    async fn accepting_every_case_completes() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(3);

        let (outcome, sink) =
            drive(&executor, &mut cases, &["", "ok", "y"], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(statuses(&cases), vec![CaseStatus::Accepted; 3]);
        assert_eq!(executor.runs(), vec!["case1", "case2", "case3"]);

        let banners: Vec<_> = sink.banners().map(|b| b.map(|b| b.text.clone())).collect();
        assert_eq!(banners.len(), 3);
        assert_eq!(banners[0], None);
        assert_eq!(
            banners[1].as_deref(),
            Some("You ACCEPTED the previous comparison\nYou can use [b]ack to revisit the previous test case")
        );
        Ok(())
    }

    #[tokio::test]
    async fn header_reports_remaining_cases() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(3);

        let (_, sink) = drive(&executor, &mut cases, &["", "", ""], NavigatorOptions::default()).await?;

        let text = sink.text();
        assert!(text.contains("TEST CASE 1 (2 left)"));
        assert!(text.contains("TEST CASE 3 (0 left)"));
        assert!(text.contains("Options: case2"));
        Ok(())
    }

    #[tokio::test]
    async fn back_on_third_case_reruns_second() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(5);

        let (outcome, _) = drive(
            &executor,
            &mut cases,
            &["", "", "b", "", "", "", ""],
            NavigatorOptions::default(),
        )
        .await?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(
            executor.runs(),
            vec!["case1", "case2", "case3", "case2", "case3", "case4", "case5"]
        );
        assert_eq!(statuses(&cases), vec![CaseStatus::Accepted; 5]);
        Ok(())
    }

    #[tokio::test]
    async fn back_on_first_case_reruns_it() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(2);

        let (outcome, sink) =
            drive(&executor, &mut cases, &["b", "", ""], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(executor.runs(), vec!["case1", "case1", "case2"]);

        let second_banner = sink.banners().nth(1).flatten().map(|b| b.text.clone());
        assert_eq!(
            second_banner.as_deref(),
            Some("You're REVISITING the previous test case")
        );
        Ok(())
    }

    #[tokio::test]
    async fn retry_reruns_same_case() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(1);

        let (outcome, sink) =
            drive(&executor, &mut cases, &["r", "s"], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(executor.runs(), vec!["case1", "case1"]);
        assert_eq!(statuses(&cases), vec![CaseStatus::Skipped]);

        let second_banner = sink.banners().nth(1).flatten().map(|b| b.style);
        assert_eq!(second_banner, Some(Style::Accent));
        Ok(())
    }

    #[tokio::test]
    async fn retry_reclassifies_auto_marked_case() -> anyhow::Result<()> {
        let executor = FakeExecutor::mismatching_first_run(&["case1"]);
        let mut cases = cases(1);

        let (outcome, sink) =
            drive(&executor, &mut cases, &["r", ""], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(executor.runs(), vec!["case1", "case1"]);
        assert_eq!(statuses(&cases), vec![CaseStatus::Accepted]);
        assert_eq!(sink.text().matches("AUTO-MARKED for you").count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn interrupt_at_prompt_aborts() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(2);
        let mut sink = Transcript::new();
        let mut input = ScriptedInput::from_results([ReadResult::Interrupted]);

        let outcome = Navigator::new(&executor, &mut sink, &mut input, NavigatorOptions::default())
            .run(&mut cases)
            .await?;

        assert_eq!(outcome, RunOutcome::Aborted);
        assert_eq!(executor.runs(), vec!["case1"]);
        assert_eq!(statuses(&cases), vec![CaseStatus::Pending, CaseStatus::Pending]);
        Ok(())
    }

    #[tokio::test]
    async fn quit_leaves_remaining_cases_pending() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(3);

        let (outcome, _) = drive(&executor, &mut cases, &["m", "Q"], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Aborted);
        assert_eq!(
            statuses(&cases),
            vec![CaseStatus::Marked, CaseStatus::Pending, CaseStatus::Pending]
        );
        Ok(())
    }

    #[tokio::test]
    async fn end_of_input_aborts() -> anyhow::Result<()> {
        let executor = FakeExecutor::default();
        let mut cases = cases(2);

        let (outcome, _) = drive(&executor, &mut cases, &[], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Aborted);
        assert_eq!(executor.runs(), vec!["case1"]);
        assert_eq!(statuses(&cases), vec![CaseStatus::Pending; 2]);
        Ok(())
    }

    #[tokio::test]
    async fn auto_marked_case_ignores_skip_and_mark() -> anyhow::Result<()> {
        let executor = FakeExecutor::mismatching(&["case1", "case2"]);
        let mut cases = cases(2);

        let (outcome, sink) =
            drive(&executor, &mut cases, &["s", "m"], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(statuses(&cases), vec![CaseStatus::AutoMarked; 2]);

        let text = sink.text();
        assert!(text.contains("AUTO-MARKED for you"));
        assert!(text.contains("RET or anything else to CONTINUE:"));
        assert!(!text.contains("RET or anything else to ACCEPT:"));
        Ok(())
    }

    #[tokio::test]
    async fn quitting_auto_marked_case_keeps_flag() -> anyhow::Result<()> {
        let executor = FakeExecutor::mismatching(&["case1"]);
        let mut cases = cases(1);

        let (outcome, _) = drive(&executor, &mut cases, &["q"], NavigatorOptions::default()).await?;

        assert_eq!(outcome, RunOutcome::Aborted);
        assert_eq!(statuses(&cases), vec![CaseStatus::AutoMarked]);
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_row_is_styled_as_failure() -> anyhow::Result<()> {
        let executor = FakeExecutor::mismatching(&["case1"]);
        let mut cases = cases(1);

        let (_, sink) = drive(&executor, &mut cases, &[""], NavigatorOptions::default()).await?;

        let table = sink.tables().next().cloned().unwrap_or_default();
        assert_eq!(table.title, "Output Comparison (ref <--> cand)");
        assert_eq!(table.columns[0].header, "$ ref case1");
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].style, None);
        assert_eq!(table.rows[1].cells[0].text, "<NO STDERR>");
        assert_eq!(table.rows[2].style, Some(Style::Failure));
        assert_eq!(table.rows[2].cells[1].text, "Exit code: 1");
        Ok(())
    }

    #[tokio::test]
    async fn diff_view_is_optional() -> anyhow::Result<()> {
        struct Shuffled;

        #[async_trait::async_trait]
        impl CaseExecutor for Shuffled {
            fn label(&self, _program: Program) -> &str {
                "prog"
            }

            fn describe(&self, _program: Program, args: &str) -> String {
                args.to_owned()
            }

            async fn run_pair(
                &self,
                _args: &str,
                _sink: &mut dyn RenderSink,
            ) -> Result<ExecutionPair, Error> {
                let reference = ExecutionResult {
                    stdout: "a\nb\n".into(),
                    stderr: String::new(),
                    exit_code: Some(0),
                };
                let candidate = ExecutionResult {
                    stdout: "b\na\n".into(),
                    ..reference.clone()
                };
                Ok(ExecutionPair {
                    reference,
                    candidate,
                })
            }
        }

        let replies = ScriptedInput::new([""]);

        let mut sink = Transcript::new();
        let mut input = replies.clone();
        let mut cases = cases(1);
        Navigator::new(&Shuffled, &mut sink, &mut input, NavigatorOptions::default())
            .run(&mut cases)
            .await?;
        assert!(!sink.text().contains("Differences in stdout"));

        let mut sink = Transcript::new();
        let mut input = replies;
        let mut cases = self::cases(1);
        Navigator::new(&Shuffled, &mut sink, &mut input, NavigatorOptions { show_diff: true })
            .run(&mut cases)
            .await?;
        assert!(sink.text().contains("Differences in stdout"));
        let has_line = |prefix: &str, style: Style| {
            sink.items().iter().any(|item| {
                matches!(item, Rendered::Line(line, s) if line.starts_with(prefix) && *s == style)
            })
        };
        assert!(has_line("- ", Style::Failure));
        assert!(has_line("+ ", Style::Success));
        Ok(())
    }
}
