//! Server Error Module.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServeError>;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Signal(#[from] ctrlc::Error),

    #[error("worker pool is shut down")]
    PoolClosed,
}
