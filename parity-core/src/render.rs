//! Presentation of harness output to the operator.
//!
//! Components never write to the terminal directly; they hand line-oriented
//! or tabular payloads to a [`RenderSink`], tagged with a [`Style`] hint. The
//! interactive layer supplies a terminal-backed sink, while [`Transcript`]
//! records everything for headless runs and tests.

use crate::error::Error;

/// Presentation hint attached to rendered content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// No particular styling.
    #[default]
    Plain,
    /// Strong emphasis.
    Bold,
    /// Light emphasis.
    Italic,
    /// Headings and identifiers.
    Accent,
    /// Neutral notices.
    Info,
    /// Positive outcomes.
    Success,
    /// Cautions and operator prompts.
    Warning,
    /// Failures and mismatches.
    Failure,
    /// De-emphasized content.
    Muted,
}

/// A banner displayed at the top of a freshly cleared display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    /// Banner text; may span multiple lines.
    pub text: String,
    /// Banner style.
    pub style: Style,
}

impl Banner {
    /// Creates a new banner.
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Horizontal alignment of a table column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Align to the left edge.
    #[default]
    Left,
    /// Align to the right edge.
    Right,
}

/// A column of a [`Table`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Column header.
    pub header: String,
    /// Alignment of the column's cells.
    pub align: Align,
    /// Default style of the column's cells.
    pub style: Style,
}

/// A single cell of a [`Table`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Cell text; may span multiple lines.
    pub text: String,
    /// Style overriding the column's style, if any.
    pub style: Option<Style>,
}

impl Cell {
    /// Creates a cell with an explicit style.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self { text, style: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}

/// A row of a [`Table`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    /// The row's cells, one per column.
    pub cells: Vec<Cell>,
    /// Style applied to every cell of the row, overriding column styles.
    pub style: Option<Style>,
}

/// A titled table of rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Table title.
    pub title: String,
    /// Table columns.
    pub columns: Vec<Column>,
    /// Table rows.
    pub rows: Vec<Row>,
    /// Whether to draw separators between rows.
    pub row_separators: bool,
}

impl Table {
    /// Creates an empty table with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Adds a column to the table.
    #[must_use]
    pub fn column(mut self, header: impl Into<String>, align: Align, style: Style) -> Self {
        self.columns.push(Column {
            header: header.into(),
            align,
            style,
        });
        self
    }

    /// Enables separators between rows.
    #[must_use]
    pub const fn with_row_separators(mut self) -> Self {
        self.row_separators = true;
        self
    }

    /// Appends a row to the table.
    pub fn push_row(&mut self, cells: impl IntoIterator<Item = Cell>, style: Option<Style>) {
        self.rows.push(Row {
            cells: cells.into_iter().collect(),
            style,
        });
    }
}

/// Destination for everything the harness presents to the operator.
pub trait RenderSink: Send {
    /// Clears the display, then shows the banner (if any) at its top.
    fn clear(&mut self, banner: Option<&Banner>) -> Result<(), Error>;

    /// Writes a single line of text.
    fn line(&mut self, text: &str, style: Style) -> Result<(), Error>;

    /// Writes a block of text set apart from the surrounding output.
    fn panel(&mut self, text: &str, style: Style) -> Result<(), Error>;

    /// Writes a table.
    fn table(&mut self, table: &Table) -> Result<(), Error>;

    /// Writes an empty line.
    fn blank(&mut self) -> Result<(), Error> {
        self.line("", Style::Plain)
    }
}

/// One item captured by a [`Transcript`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    /// The display was cleared.
    Clear(Option<Banner>),
    /// A line was written.
    Line(String, Style),
    /// A panel was written.
    Panel(String, Style),
    /// A table was written.
    Table(Table),
}

/// A render sink that records everything it is given.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    items: Vec<Rendered>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded items.
    pub fn items(&self) -> &[Rendered] {
        &self.items
    }

    /// Returns the tables recorded so far.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.items.iter().filter_map(|item| match item {
            Rendered::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Returns the banners shown each time the display was cleared.
    pub fn banners(&self) -> impl Iterator<Item = Option<&Banner>> {
        self.items.iter().filter_map(|item| match item {
            Rendered::Clear(banner) => Some(banner.as_ref()),
            _ => None,
        })
    }

    /// Flattens the transcript into plain text, one item per line.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for item in &self.items {
            match item {
                Rendered::Clear(Some(banner)) => text.push_str(&banner.text),
                Rendered::Clear(None) => (),
                Rendered::Line(line, _) | Rendered::Panel(line, _) => text.push_str(line),
                Rendered::Table(table) => {
                    text.push_str(&table.title);
                    for row in &table.rows {
                        for cell in &row.cells {
                            text.push('\n');
                            text.push_str(&cell.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
        text
    }
}

impl RenderSink for Transcript {
    fn clear(&mut self, banner: Option<&Banner>) -> Result<(), Error> {
        self.items.push(Rendered::Clear(banner.cloned()));
        Ok(())
    }

    fn line(&mut self, text: &str, style: Style) -> Result<(), Error> {
        self.items.push(Rendered::Line(text.to_owned(), style));
        Ok(())
    }

    fn panel(&mut self, text: &str, style: Style) -> Result<(), Error> {
        self.items.push(Rendered::Panel(text.to_owned(), style));
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<(), Error> {
        self.items.push(Rendered::Table(table.clone()));
        Ok(())
    }
}
