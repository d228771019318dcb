//! File fetching client.

pub mod error;
pub mod exchange;
pub mod format;
pub mod net;
pub mod prompt;
pub mod session;
pub mod sink;

mod settings;

#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ClientError, Result};
pub use exchange::ReceiveStrategy;
pub use net::Network;
pub use prompt::{Prompt, StdPrompt};
pub use session::Session;
pub use sink::DirSinks;

/// Client options, built with chained setters.
///
/// The binary runs with the defaults; the receive strategy, deadlines and
/// output directory are only changed by callers that build their own
/// options, such as the unit tests.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub(crate) port: u16,

    // capacity of the receive buffer, bounds the size of a file
    // fetched with a single read.
    pub(crate) buffer_size: usize,

    pub(crate) read_timeout: Option<Duration>,

    pub(crate) write_timeout: Option<Duration>,

    // defaults to the directory of the executable.
    pub(crate) output_dir: Option<PathBuf>,

    pub(crate) receive_strategy: ReceiveStrategy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            port: settings::DEFAULT_PORT,
            buffer_size: settings::DEFAULT_BUFLEN,
            read_timeout: None,
            write_timeout: None,
            output_dir: None,
            receive_strategy: ReceiveStrategy::SingleRead,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn port(mut self, value: u16) -> Self {
        self.port = value;
        self
    }

    #[allow(dead_code)]
    pub fn buffer_size(mut self, value: usize) -> Self {
        self.buffer_size = value.max(1);
        self
    }

    #[allow(dead_code)]
    pub fn read_timeout(mut self, value: Option<Duration>) -> Self {
        self.read_timeout = value;
        self
    }

    #[allow(dead_code)]
    pub fn write_timeout(mut self, value: Option<Duration>) -> Self {
        self.write_timeout = value;
        self
    }

    #[allow(dead_code)]
    pub fn output_dir(mut self, value: impl AsRef<Path>) -> Self {
        self.output_dir = Some(value.as_ref().to_path_buf());
        self
    }

    #[allow(dead_code)]
    pub fn receive_strategy(mut self, value: ReceiveStrategy) -> Self {
        self.receive_strategy = value;
        self
    }

    /// Sinks in the configured output directory, or beside the executable.
    pub fn sinks(&self) -> Result<DirSinks> {
        match &self.output_dir {
            Some(dir) => Ok(DirSinks::new(dir)),
            None => DirSinks::beside_executable().map_err(|source| ClientError::Io {
                path: PathBuf::from("."),
                source,
            }),
        }
    }
}
