// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration errors returned when opening a logger.
//!
//! Everything else that can go wrong while logging is either a programming error
//! (which panics) or an async write failure (which is dropped by design).

use std::io;
use std::path::PathBuf;

/// Result type for logger setup.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured level name is not one of DEBUG, INFO, WARN, ERROR, FATAL.
    #[error("invalid log level: {0:?}")]
    InvalidLogLevel(String),

    /// The log file could not be created or opened for append.
    #[error("failed to open log file {}: {source}", path.display())]
    FailedToOpenLogFile {
        /// The path that failed to open
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },
}
