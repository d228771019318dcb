//! Server defaults.

pub const DEFAULT_PORT: u16 = 27015;

/// Requests are read with a single bounded read of this size.
pub const REQUEST_BUFLEN: usize = 512;

/// Directory served when none is given on the command line.
pub const DEFAULT_ROOT: &str = "files";

pub const WORKERS: usize = 4;
