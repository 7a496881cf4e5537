use std::io::Write;

use colored::Colorize;
use parity_core::render::{Align, Banner, Column, RenderSink, Row, Style, Table};
use parity_core::Error;

const DEFAULT_WIDTH: usize = 80;
const TAB: &str = "    ";

/// Options for a [`TerminalSink`].
#[derive(Clone, Debug)]
pub struct TerminalOptions {
    /// Write plain text without any color or emphasis.
    pub disable_color: bool,
    /// Actually clear the screen when asked to; only sensible on a terminal.
    pub clear_screen: bool,
    /// Fixed display width; queried from the terminal when unset.
    pub width: Option<usize>,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            disable_color: false,
            clear_screen: true,
            width: None,
        }
    }
}

/// Renders harness output as styled text on a terminal.
pub struct TerminalSink<W: Write + Send> {
    writer: W,
    options: TerminalOptions,
}

impl TerminalSink<std::io::Stdout> {
    /// Creates a sink writing to standard output.
    pub fn stdout(options: TerminalOptions) -> Self {
        Self::new(std::io::stdout(), options)
    }
}

impl<W: Write + Send> TerminalSink<W> {
    /// Creates a sink writing to the given writer.
    pub const fn new(writer: W, options: TerminalOptions) -> Self {
        Self { writer, options }
    }

    /// Consumes the sink, returning its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn width(&self) -> usize {
        self.options
            .width
            .or_else(|| {
                crossterm::terminal::size()
                    .ok()
                    .map(|(cols, _)| usize::from(cols))
            })
            .unwrap_or(DEFAULT_WIDTH)
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.options.disable_color {
            return text.to_owned();
        }

        match style {
            Style::Plain => text.normal(),
            Style::Bold => text.bold(),
            Style::Italic => text.italic(),
            Style::Accent => text.cyan(),
            Style::Info => text.blue(),
            Style::Success => text.green(),
            Style::Warning => text.yellow(),
            Style::Failure => text.red(),
            Style::Muted => text.bright_black(),
        }
        .to_string()
    }

    fn write_block(&mut self, block: &str) -> Result<(), Error> {
        writeln!(self.writer, "{block}").map_err(Error::RenderError)?;
        self.writer.flush().map_err(Error::RenderError)
    }

    fn render_table(&self, table: &Table) -> Vec<String> {
        let widths: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.cells.get(i))
                    .flat_map(|cell| text_lines(&cell.text))
                    .map(|line| visible_width(&line))
                    .chain(std::iter::once(visible_width(&column.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let total_width = widths.iter().map(|w| w + 3).sum::<usize>() + 1;

        let mut lines: Vec<String> = text_lines(&table.title)
            .iter()
            .map(|line| {
                let pad = total_width.saturating_sub(visible_width(line)) / 2;
                std::format!("{}{}", " ".repeat(pad), self.paint(line, Style::Bold))
            })
            .collect();

        if table.columns.is_empty() {
            return lines;
        }

        lines.push(rule(&widths, '┌', '┬', '┐'));

        let headers: Vec<Vec<(String, Style)>> = table
            .columns
            .iter()
            .map(|column| vec![(column.header.clone(), Style::Accent)])
            .collect();
        lines.extend(self.render_row_lines(&table.columns, &widths, &headers));
        lines.push(rule(&widths, '├', '┼', '┤'));

        for (index, row) in table.rows.iter().enumerate() {
            if index > 0 && table.row_separators {
                lines.push(rule(&widths, '├', '┼', '┤'));
            }

            let cells = row_cells(&table.columns, row);
            lines.extend(self.render_row_lines(&table.columns, &widths, &cells));
        }

        lines.push(rule(&widths, '└', '┴', '┘'));

        lines
    }

    fn render_row_lines(
        &self,
        columns: &[Column],
        widths: &[usize],
        cells: &[Vec<(String, Style)>],
    ) -> Vec<String> {
        let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

        (0..height)
            .map(|line_index| {
                let mut line = String::from("│");
                for ((column, width), cell) in columns.iter().zip(widths).zip(cells) {
                    let (text, style) = cell
                        .get(line_index)
                        .map_or(("", Style::Plain), |(text, style)| (text.as_str(), *style));

                    let padding = " ".repeat(width.saturating_sub(visible_width(text)));
                    let painted = self.paint(text, style);

                    line.push(' ');
                    match column.align {
                        Align::Left => {
                            line.push_str(&painted);
                            line.push_str(&padding);
                        }
                        Align::Right => {
                            line.push_str(&padding);
                            line.push_str(&painted);
                        }
                    }
                    line.push_str(" │");
                }
                line
            })
            .collect()
    }

    fn center(&self, lines: &[String]) -> String {
        let block = lines.join("\n");
        let block_width = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        let pad = self.width().saturating_sub(block_width) / 2;

        if pad == 0 {
            block
        } else {
            indent::indent_all_by(pad, block)
        }
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn clear(&mut self, banner: Option<&Banner>) -> Result<(), Error> {
        if self.options.clear_screen {
            crossterm::execute!(
                self.writer,
                crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
                crossterm::terminal::Clear(crossterm::terminal::ClearType::Purge),
                crossterm::cursor::MoveTo(0, 0)
            )
            .map_err(Error::RenderError)?;
        }

        if let Some(banner) = banner {
            self.panel(&banner.text, banner.style)?;
        }

        Ok(())
    }

    fn line(&mut self, text: &str, style: Style) -> Result<(), Error> {
        let painted = self.paint(text, style);
        self.write_block(&painted)
    }

    fn panel(&mut self, text: &str, style: Style) -> Result<(), Error> {
        let mut lines = text_lines(text);
        if lines.is_empty() {
            lines.push(String::new());
        }

        let content_width = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        let inner = content_width.max(self.width().saturating_sub(4));
        let border = "─".repeat(inner + 2);

        let mut block = vec![self.paint(&std::format!("┌{border}┐"), style)];
        for line in &lines {
            let padding = " ".repeat(inner - visible_width(line));
            block.push(std::format!(
                "{} {}{padding} {}",
                self.paint("│", style),
                self.paint(line, style),
                self.paint("│", style)
            ));
        }
        block.push(self.paint(&std::format!("└{border}┘"), style));

        self.write_block(&block.join("\n"))
    }

    fn table(&mut self, table: &Table) -> Result<(), Error> {
        let lines = self.render_table(table);
        let centered = self.center(&lines);
        self.write_block(&centered)
    }
}

fn row_cells(columns: &[Column], row: &Row) -> Vec<Vec<(String, Style)>> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let Some(cell) = row.cells.get(i) else {
                return vec![];
            };
            let style = cell.style.or(row.style).unwrap_or(column.style);
            text_lines(&cell.text)
                .into_iter()
                .map(|line| (line, style))
                .collect()
        })
        .collect()
}

fn rule(widths: &[usize], left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    std::format!("{left}{}{right}", segments.join(&middle.to_string()))
}

/// Splits text into display lines, expanding tabs so widths stay predictable.
fn text_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.replace('\t', TAB)).collect()
}

/// Number of terminal columns taken by the text, ignoring escape sequences.
fn visible_width(text: &str) -> usize {
    strip_ansi_escapes::strip_str(text).chars().count()
}
