//! Error types for the [`organize`](super) module.
//!
//! Each variant names the step of the organize transaction that failed and
//! carries the underlying reason, so a single outcome line is enough for a
//! human to act on. The full `exn` tree is still attached for logs.

use darkroom_extract::error::{Error as ExtractError, ErrorKind as ExtractErrorKind};
use darkroom_storage::error::Error as StorageError;
use derive_more::{Display, Error};

/// An organize error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for organize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// ### Fatal for the file
/// - [`ErrorKind::Extraction`]: nothing has been touched yet.
/// - [`ErrorKind::Directory`], [`ErrorKind::Relocation`]: the file is still
///   at its source.
///
/// ### Warnings
/// - [`ErrorKind::Thumbnail`], [`ErrorKind::Backup`]: the file has already
///   been organized and stays organized.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("{_0}")]
    Extraction(ExtractErrorKind),
    #[display("could not create destination directory: {_0}")]
    Directory(#[error(not(source))] String),
    #[display("could not relocate file: {_0}")]
    Relocation(#[error(not(source))] String),
    #[display("could not create thumbnail: {_0}")]
    Thumbnail(#[error(not(source))] String),
    #[display("could not back up file: {_0}")]
    Backup(#[error(not(source))] String),
}

impl ErrorKind {
    #[track_caller]
    pub(crate) fn extraction(err: ExtractError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Extraction(inner))
    }

    /// Wraps a storage failure in the given step's kind, keeping its message.
    #[track_caller]
    pub(crate) fn storage(err: StorageError, step: fn(String) -> ErrorKind) -> Error {
        let reason = (*err).to_string();
        err.raise(step(reason))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Extraction(kind) => kind.is_retryable(),
            Self::Directory(_) | Self::Relocation(_) | Self::Thumbnail(_) | Self::Backup(_) => true,
        }
    }
}
