//! Line-oriented terminal input shared by the interactive commands.

use std::io::Write;

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads trimmed lines after printing a prompt. Stdin unless built
/// [`from_reader`](Prompter::from_reader).
pub struct Prompter<R = BufReader<Stdin>> {
    lines: Lines<R>,
}

impl Prompter {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `prompt` and wait for the next line. `None` means stdin closed.
    pub async fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }
}

/// `exit` and `quit` end an interactive loop.
pub fn is_exit(input: &str) -> bool {
    matches!(input.to_ascii_lowercase().as_str(), "exit" | "quit")
}

/// Any answer starting with `y` counts as yes.
pub fn is_yes(input: &str) -> bool {
    input.to_ascii_lowercase().starts_with('y')
}
