//! Case-definition files and the test cases parsed from them.
//!
//! A case-definition file is line oriented:
//!
//! * A blank line separates groups of cases and clears the current context.
//! * A line beginning with `#` sets the context annotation for the command
//!   lines that follow it.
//! * A line exactly matching the barrier text switches every later case into
//!   "custom" mode.
//! * Any other line is a command line holding the arguments passed to both
//!   programs under comparison. A lone `` ` `` stands for "no arguments".

use std::collections::BTreeSet;
use std::fmt::Display;
use std::io::BufRead;
use std::path::Path;

use crate::{error::Error, trace_categories};

/// Default text of the line separating provided cases from custom ones.
pub const DEFAULT_BARRIER: &str = "#      Your Custom Cases      #";

/// Default sentinel standing in for a case that passes no arguments.
pub const DEFAULT_EMPTY_COMMAND: &str = "`";

const COMMENT_MARKER: char = '#';

/// How a test case has been resolved during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseStatus {
    /// Not yet resolved; either unreached or still being worked on.
    #[default]
    Pending,
    /// The operator accepted the comparison.
    Accepted,
    /// The operator flagged the comparison as a defect.
    Marked,
    /// The comparison was flagged automatically because of an obvious mismatch.
    AutoMarked,
    /// The operator skipped the case.
    Skipped,
}

impl Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Marked => write!(f, "marked"),
            Self::AutoMarked => write!(f, "auto-marked"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// A single test case loaded from a case-definition file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    /// Case number, assigned in file order before any filtering.
    pub num: u32,
    /// 1-based line number of the command in the case-definition file.
    pub source_line: usize,
    /// Arguments passed to both programs; empty if the case passes none.
    pub command: String,
    /// Annotation taken from the nearest preceding comment line, if any.
    pub context: Option<String>,
    /// Whether the case appears after the custom-case barrier.
    pub is_custom: bool,
    /// How the case has been resolved so far.
    pub status: CaseStatus,
}

/// Selects which case numbers survive parsing.
///
/// Inclusion and exclusion are mutually exclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CaseFilter {
    /// Every case is kept.
    #[default]
    All,
    /// Only the listed case numbers are kept.
    Include(BTreeSet<u32>),
    /// The listed case numbers are dropped.
    Exclude(BTreeSet<u32>),
}

impl CaseFilter {
    /// Returns whether the case with the given number passes this filter.
    pub fn admits(&self, num: u32) -> bool {
        match self {
            Self::All => true,
            Self::Include(nums) => nums.contains(&num),
            Self::Exclude(nums) => !nums.contains(&num),
        }
    }
}

/// Options controlling how a case-definition file is parsed.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Which case numbers to keep.
    pub filter: CaseFilter,
    /// Only keep cases defined after the custom-case barrier.
    pub custom_only: bool,
    /// Text of the custom-case barrier line.
    pub barrier: String,
    /// Command text denoting an empty argument list.
    pub empty_command: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filter: CaseFilter::All,
            custom_only: false,
            barrier: DEFAULT_BARRIER.into(),
            empty_command: DEFAULT_EMPTY_COMMAND.into(),
        }
    }
}

/// The cases produced by parsing a case-definition file.
#[derive(Clone, Debug, Default)]
pub struct ParsedCases {
    /// Surviving cases, in file order.
    pub cases: Vec<TestCase>,
    /// Number of surviving cases defined before the barrier.
    pub provided_count: usize,
    /// Number of surviving cases defined after the barrier.
    pub custom_count: usize,
    /// Number of command lines dropped by the case filter.
    pub discarded_count: usize,
}

impl ParsedCases {
    /// Returns the total number of surviving cases.
    pub const fn total(&self) -> usize {
        self.provided_count + self.custom_count
    }
}

/// Line-by-line parser for case-definition files.
pub struct CaseParser<'a> {
    options: &'a ParseOptions,
    context: Option<String>,
    past_barrier: bool,
    next_num: u32,
    parsed: ParsedCases,
}

impl<'a> CaseParser<'a> {
    /// Creates a new parser using the given options.
    pub fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            context: None,
            past_barrier: false,
            next_num: 1,
            parsed: ParsedCases::default(),
        }
    }

    /// Feeds one line (without its line terminator) to the parser.
    ///
    /// # Arguments
    ///
    /// * `line_num` - The 1-based line number of `line` in its source.
    /// * `line` - The line's contents.
    pub fn feed(&mut self, line_num: usize, line: &str) {
        if line.trim().is_empty() {
            self.context = None;
            return;
        }

        if line == self.options.barrier {
            tracing::debug!(target: trace_categories::PARSE, "custom barrier at line {line_num}");
            self.past_barrier = true;
            return;
        }

        if self.options.custom_only && !self.past_barrier {
            return;
        }

        if line.starts_with(COMMENT_MARKER) {
            let context = line
                .trim_start_matches(|c| c == COMMENT_MARKER || c == ' ')
                .trim_end();
            self.context = (!context.is_empty()).then(|| context.to_owned());
            return;
        }

        let num = self.next_num;
        self.next_num += 1;

        if !self.options.filter.admits(num) {
            tracing::debug!(target: trace_categories::PARSE, "filtered out case {num} (line {line_num})");
            self.parsed.discarded_count += 1;
            return;
        }

        let mut command = line.trim();
        if command == self.options.empty_command {
            command = "";
        }

        tracing::debug!(target: trace_categories::PARSE, "case {num} (line {line_num}): '{command}'");

        self.parsed.cases.push(TestCase {
            num,
            source_line: line_num,
            command: command.to_owned(),
            context: self.context.clone(),
            is_custom: self.past_barrier,
            status: CaseStatus::Pending,
        });

        if self.past_barrier {
            self.parsed.custom_count += 1;
        } else {
            self.parsed.provided_count += 1;
        }
    }

    /// Finishes parsing and yields the parsed cases.
    pub fn finish(self) -> ParsedCases {
        self.parsed
    }
}

/// Parses case definitions from a buffered reader.
pub fn parse_cases(reader: impl BufRead, options: &ParseOptions) -> std::io::Result<ParsedCases> {
    let mut parser = CaseParser::new(options);
    for (index, line) in reader.lines().enumerate() {
        parser.feed(index + 1, &line?);
    }

    Ok(parser.finish())
}

/// Parses case definitions held in memory.
pub fn parse_cases_str(text: &str, options: &ParseOptions) -> ParsedCases {
    let mut parser = CaseParser::new(options);
    for (index, line) in text.lines().enumerate() {
        parser.feed(index + 1, line);
    }

    parser.finish()
}

/// Loads and parses the case-definition file at the given path.
///
/// A missing or unreadable file is reported as [`Error::CaseFileUnreadable`].
pub fn load_cases(path: &Path, options: &ParseOptions) -> Result<ParsedCases, Error> {
    tracing::debug!(target: trace_categories::PARSE, "loading cases from {}", path.display());

    let file = std::fs::File::open(path)
        .map_err(|e| Error::CaseFileUnreadable(path.to_owned(), e))?;

    parse_cases(std::io::BufReader::new(file), options)
        .map_err(|e| Error::CaseFileUnreadable(path.to_owned(), e))
}
