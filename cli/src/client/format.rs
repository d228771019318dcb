//! Wire format.
//!
//! A request is the raw bytes of a filename, with no length prefix and no
//! terminator. A response is whatever one bounded read returns: either a
//! rejection starting with the literal `Error`, or the file contents.
//!
//! The prefix match is the only discriminator, so a file whose first five
//! bytes are `Error` reads as a rejection. The legacy server expects this
//! format byte-for-byte, so it is kept as is.

use std::fmt::Display;

use super::settings::{ERROR_PREFIX, EXIT_SENTINEL};

/// Filename requested from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request(String);

impl Request {
    /// Returns `None` for an empty name, which cannot be requested.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            return None;
        }
        Some(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl AsRef<[u8]> for Request {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line typed at the filename prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Leave the session without sending anything.
    Exit,
    /// Nothing typed, prompt again.
    Empty,
    Fetch(Request),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = trim_line_terminator(line);

        if line == EXIT_SENTINEL {
            return Self::Exit;
        }

        match Request::new(line) {
            Some(request) => Self::Fetch(request),
            None => Self::Empty,
        }
    }
}

/// Strips one trailing `\n` or `\r\n`; everything else is kept verbatim.
pub fn trim_line_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => line,
    }
}

/// Classified view of a received buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum Response<'a> {
    /// Server declined the request; holds its human-readable message.
    Rejected(String),
    /// File contents.
    Payload(&'a [u8]),
}

impl<'a> Response<'a> {
    pub fn classify(buf: &'a [u8]) -> Self {
        match buf.strip_prefix(ERROR_PREFIX) {
            Some(rest) => {
                // skip the delimiter byte following the prefix.
                let message = rest.get(1..).unwrap_or(&[]);
                Self::Rejected(String::from_utf8_lossy(message).trim().to_string())
            }
            None => Self::Payload(buf),
        }
    }
}
