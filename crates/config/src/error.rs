//! Configuration Error Types
//!
//! Everything here is detected when a configuration is accepted, before any
//! file is touched.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration source could not be read or did not match the schema.
    #[display("could not load configuration: {_0}")]
    Load(#[error(not(source))] String),
    #[display("no destination directory configured")]
    MissingDestination,
    #[display("backup is enabled but no backup location is configured")]
    MissingBackupLocation,
    #[display("thumbnail size must be non-zero, got {width}x{height}")]
    InvalidThumbnailSize { width: u32, height: u32 },
    /// A configured source directory does not exist (or is not a directory).
    #[display("source directory does not exist: {}", _0.display())]
    MissingSourceDirectory(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A source folder on a removable drive may simply not be mounted yet.
        matches!(self, Self::MissingSourceDirectory(_))
    }
}
