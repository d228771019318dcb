//! Compiled-in client defaults.

/// Port the file server listens on.
pub const DEFAULT_PORT: u16 = 27015;

/// Capacity of the receive buffer, one response is read into it at once.
pub const DEFAULT_BUFLEN: usize = 512;

/// Literal prefix a server uses to reject a request.
pub const ERROR_PREFIX: &[u8] = b"Error";

/// Filename that ends the session instead of being requested.
pub const EXIT_SENTINEL: &str = "exit";

pub const FILENAME_PROMPT: &str = "Enter the name of the file to request ('exit' to quit): ";

pub const CONTINUE_PROMPT: &str = "Do you want to request another file?";
