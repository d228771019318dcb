//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use super::error::{ClientError, Result};
use super::prompt::Prompt;

/// In-memory connection: scripted replies in, captured requests out.
/// Reads past the script return 0 bytes, like a closed peer.
#[derive(Debug, Default)]
pub struct MockConn {
    replies: VecDeque<std::result::Result<Vec<u8>, io::ErrorKind>>,
    write_limit: Option<usize>,
    write_error: Option<io::ErrorKind>,
    pub written: Vec<u8>,
    pub writes: usize,
}

impl MockConn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, data: &[u8]) -> Self {
        self.replies.push_back(Ok(data.to_vec()));
        self
    }

    pub fn read_error(mut self, kind: io::ErrorKind) -> Self {
        self.replies.push_back(Err(kind));
        self
    }

    pub fn write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    pub fn write_error(mut self, kind: io::ErrorKind) -> Self {
        self.write_error = Some(kind);
        self
    }

    /// Scripted bytes not read yet.
    pub fn pending(&self) -> usize {
        self.replies
            .iter()
            .map(|r| r.as_ref().map(Vec::len).unwrap_or(0))
            .sum()
    }
}

impl Read for MockConn {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.replies.pop_front() {
            None => Ok(0),
            Some(Err(kind)) => Err(kind.into()),
            Some(Ok(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.replies.push_front(Ok(data.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

impl Write for MockConn {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        if let Some(kind) = self.write_error {
            return Err(kind.into());
        }
        let n = buf.len().min(self.write_limit.unwrap_or(usize::MAX));
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Operator answering from a fixed script.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub shown: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            ClientError::Input(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "script exhausted",
            ))
        })
    }

    fn show(&mut self, message: &str) -> Result<()> {
        self.shown.push(message.to_string());
        Ok(())
    }
}
