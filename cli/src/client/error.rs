//! Client Error Module.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Name resolution or every connect attempt failed.
    #[error("unable to connect to server '{host}': {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("error reading user input: {0}")]
    Input(#[source] io::Error),

    /// Prompt or message could not be written to the terminal.
    #[error("error writing to the terminal: {0}")]
    Output(#[source] io::Error),

    /// Send or receive failed for a reason other than a clean close.
    #[error("transport error: {0}")]
    Transport(#[source] io::Error),

    #[error("connection closed by the server")]
    PeerClosed,

    #[error("server rejected the request: {0}")]
    ServerRejected(String),

    /// Local sink could not be created or written.
    #[error("error writing file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session is closed")]
    SessionClosed,
}

impl ClientError {
    /// Only a rejection or a local sink failure leaves the connection usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ServerRejected(_) | Self::Io { .. })
    }
}
