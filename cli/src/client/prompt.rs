//! Interactive input.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use super::error::{ClientError, Result};
use super::format::trim_line_terminator;

/// The operator at the other end of the session.
pub trait Prompt {
    /// Shows `prompt` and returns the answer without its line terminator.
    fn line(&mut self, prompt: &str) -> Result<String>;

    /// Reports a message to the operator.
    fn show(&mut self, message: &str) -> Result<()>;

    /// Asks a yes/no question until it gets one of the two.
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let prompt = format!("{} (y/n): ", prompt);
        loop {
            let answer = self.line(&prompt)?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => continue,
            }
        }
    }
}

/// Prompt over a line reader and a writer, stdin/stdout in the binary.
#[derive(Debug)]
pub struct StdPrompt<R, W> {
    reader: R,
    writer: W,
}

impl StdPrompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R, W> StdPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R, W> Prompt for StdPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    fn line(&mut self, prompt: &str) -> Result<String> {
        self.writer
            .write_all(prompt.as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(ClientError::Output)?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).map_err(ClientError::Input)? == 0 {
            return Err(ClientError::Input(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input",
            )));
        }

        Ok(trim_line_terminator(&line).to_string())
    }

    fn show(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message).map_err(ClientError::Output)
    }
}
