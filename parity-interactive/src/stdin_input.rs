use std::io::{BufRead, Write};

use colored::Colorize;
use parity_core::{Error, InterruptWaiter, Interrupts, OperatorInput, ReadResult};

/// Reads operator commands from standard input.
///
/// Standard input is shared with the programs under comparison, so it is only
/// read while a prompt is displayed. Each read happens on the blocking pool and
/// is raced against the interrupt hub.
pub struct StdinInput {
    interrupts: Interrupts,
    disable_color: bool,
}

impl StdinInput {
    /// Creates a new stdin-backed input source.
    ///
    /// # Arguments
    ///
    /// * `interrupts` - Hub whose interrupts cancel a pending read.
    /// * `disable_color` - Whether to display the prompt without emphasis.
    pub const fn new(interrupts: Interrupts, disable_color: bool) -> Self {
        Self {
            interrupts,
            disable_color,
        }
    }

    fn display_prompt(&self, prompt: &str) -> Result<(), Error> {
        let mut stdout = std::io::stdout();
        if self.disable_color {
            write!(stdout, "{prompt}")
        } else {
            write!(stdout, "{}", prompt.bold())
        }
        .map_err(Error::RenderError)?;

        stdout.flush().map_err(Error::RenderError)
    }
}

/// Runs a blocking read on the blocking pool, giving up on it if interrupted first.
async fn read_or_interrupt<F>(read: F, mut waiter: InterruptWaiter) -> Result<ReadResult, Error>
where
    F: FnOnce() -> std::io::Result<ReadResult> + Send + 'static,
{
    let read = tokio::task::spawn_blocking(read);

    tokio::select! {
        biased;
        () = waiter.wait() => {
            tracing::debug!("operator input interrupted");
            Ok(ReadResult::Interrupted)
        }
        joined = read => Ok(joined?.map_err(Error::InputError)?),
    }
}

#[async_trait::async_trait]
impl OperatorInput for StdinInput {
    async fn read_line(&mut self, prompt: &str) -> Result<ReadResult, Error> {
        let waiter = self.interrupts.subscribe();
        self.display_prompt(prompt)?;

        read_or_interrupt(|| read_line_from(&mut std::io::stdin().lock()), waiter).await
    }
}

/// Reads a single line from the given reader, without its line terminator.
fn read_line_from<R: BufRead>(reader: &mut R) -> std::io::Result<ReadResult> {
    let mut input = String::new();
    let bytes_read = reader.read_line(&mut input)?;

    if bytes_read == 0 {
        return Ok(ReadResult::Eof);
    }

    let trimmed_len = input.trim_end_matches(['\r', '\n']).len();
    input.truncate(trimmed_len);

    Ok(ReadResult::Input(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_lines_until_eof() -> anyhow::Result<()> {
        let mut reader = std::io::Cursor::new("s\r\n\nback");

        assert_eq!(read_line_from(&mut reader)?, ReadResult::Input("s".into()));
        assert_eq!(read_line_from(&mut reader)?, ReadResult::Input(String::new()));
        assert_eq!(read_line_from(&mut reader)?, ReadResult::Input("back".into()));
        assert_eq!(read_line_from(&mut reader)?, ReadResult::Eof);
        Ok(())
    }

    #[tokio::test]
    async fn completed_read_is_returned() -> anyhow::Result<()> {
        let interrupts = Interrupts::new();

        let result = read_or_interrupt(
            || Ok(ReadResult::Input("back".into())),
            interrupts.subscribe(),
        )
        .await?;

        assert_eq!(result, ReadResult::Input("back".into()));
        Ok(())
    }

    #[tokio::test]
    async fn interrupt_abandons_pending_read() -> anyhow::Result<()> {
        let interrupts = Interrupts::new();
        let waiter = interrupts.subscribe();
        let (release, blocked) = std::sync::mpsc::channel::<()>();

        interrupts.raise();
        let result = read_or_interrupt(
            move || {
                let _ = blocked.recv();
                Ok(ReadResult::Eof)
            },
            waiter,
        )
        .await?;

        assert_eq!(result, ReadResult::Interrupted);
        drop(release);
        Ok(())
    }
}
