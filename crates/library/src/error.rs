//! Library Error Types
//!
//! Errors that stop a whole run (or a whole scan of one folder). Per-file
//! failures never surface here; they are reported as
//! [`Outcome::Failed`](crate::organize::Outcome::Failed).

use darkroom_config::error::{Error as ConfigError, ErrorKind as ConfigErrorKind};
use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The configuration was rejected before any file was touched.
    #[display("invalid configuration: {_0}")]
    Configuration(ConfigErrorKind),
    /// The destination or backup directory cannot be used as a gallery root.
    #[display("cannot organize into {}", _0.display())]
    Gallery(#[error(not(source))] PathBuf),
    /// A source directory could not be listed.
    #[display("could not scan source directory {}", _0.display())]
    Scan(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Keeps the config crate's `Exn` frame as a child of the new one.
    #[track_caller]
    pub fn configuration(err: ConfigError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Configuration(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Configuration(kind) => kind.is_retryable(),
            Self::Gallery(_) => false,
            Self::Scan(_) => true,
        }
    }
}
